//! TypeScript client artifacts: type declarations, the typed request
//! client, and the query-bindings module.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::model::{ApexDocument, FieldType};
use crate::plan::{ParamKind, Plan};
use crate::resolve::{resolve, Target};
use crate::{Emitter, GeneratedCode, GeneratedFile};

pub struct TypeScriptEmitter;

impl Emitter for TypeScriptEmitter {
    fn emit(&self, doc: &ApexDocument, plan: &Plan) -> Result<GeneratedCode> {
        let files = vec![
            GeneratedFile {
                path: "src/api/types.ts".to_string(),
                content: render_types(doc, plan),
            },
            GeneratedFile {
                path: "src/api/apex.ts".to_string(),
                content: render_client(plan),
            },
            GeneratedFile {
                path: "src/api/queries.ts".to_string(),
                content: render_queries(plan),
            },
        ];

        Ok(GeneratedCode { files })
    }

    fn target(&self) -> &str {
        "typescript-client"
    }
}

/// One exported type per schema, one member per field.
fn render_types(doc: &ApexDocument, plan: &Plan) -> String {
    let mut out = String::from("/* Auto-generated TypeScript Types */\n\n");

    for schema in &doc.schemas {
        out.push_str(&format!("export type {} = {{\n", schema.name));
        for (field, payload) in &schema.fields {
            let ty = resolve(&FieldType::from_value(payload), &plan.known, Target::TypeScript);
            out.push_str(&format!("  {}: {};\n", field, ty));
        }
        out.push_str("}\n\n");
    }

    out
}

/// The typed request client: one function per operation, all re-exported
/// as static members of the APEX namespace object. Import lines carry
/// only the verbs and schema names actually referenced.
fn render_client(plan: &Plan) -> String {
    let mut out = String::from("/* Auto-generated API Client */\n\n");

    if !plan.used_verbs.is_empty() {
        let verbs: Vec<&str> = plan.used_verbs.iter().map(|v| v.client_fn()).collect();
        out.push_str(&format!("import {{ {} }} from './request';\n", verbs.join(", ")));
    }
    if !plan.used_schemas.is_empty() {
        out.push_str(&format!(
            "import {{ {} }} from './types';\n",
            plan.used_schemas.join(", ")
        ));
    }
    out.push('\n');

    for call in &plan.calls {
        let response = schema_or_any(call.response.as_deref(), plan);
        let (params_def, params_arg) = match &call.param {
            Some((ParamKind::Query, schema)) => (
                format!("params: {}", schema_or_any(Some(schema.as_str()), plan)),
                ", params",
            ),
            Some((ParamKind::Body, schema)) => (
                format!("body: {}", schema_or_any(Some(schema.as_str()), plan)),
                ", body",
            ),
            None => (String::new(), ""),
        };

        out.push_str(&format!(
            "async function {}({}): Promise<{}> {{\n",
            call.name, params_def, response
        ));
        out.push_str(&format!(
            "  return {}<{}>('{}'{});\n",
            call.verb.client_fn(),
            response,
            call.endpoint,
            params_arg
        ));
        out.push_str("}\n\n");
    }

    out.push_str("export default class APEX {\n");
    for call in &plan.calls {
        out.push_str(&format!("  static {} = {};\n", call.name, call.name));
    }
    out.push_str("}\n");

    out
}

/// Query-options and query-key factories for GET operations. The key
/// embeds the params object when a query schema is declared, so cache
/// keys vary with parameters.
fn render_queries(plan: &Plan) -> String {
    let mut out = String::from("/* Auto-generated Query Bindings */\n\n");
    out.push_str("import { UseQueryOptions, queryOptions } from '@tanstack/react-query';\n");
    out.push_str("import APEX from './apex';\n");

    let used: BTreeSet<&str> = plan
        .bindings
        .iter()
        .filter_map(|b| b.query_schema.as_deref())
        .filter(|name| plan.known.contains(*name))
        .collect();
    if !used.is_empty() {
        let names: Vec<&str> = used.into_iter().collect();
        out.push_str(&format!("import {{ {} }} from './types';\n", names.join(", ")));
    }

    for binding in &plan.bindings {
        let name = &binding.name;
        let key_fn = format!("get{}QueryKey", name);
        let key_type = format!("{}QueryKey", name);

        let (params_def, params_arg, key_tail) = match binding.query_schema.as_deref() {
            Some(schema) => (
                format!("params: {}", schema_or_any(Some(schema), plan)),
                "params",
                ", params",
            ),
            None => (String::new(), "", ""),
        };
        let params_lead = if params_def.is_empty() {
            String::new()
        } else {
            format!("{}, ", params_def)
        };

        out.push_str(&format!(
            "\nexport function create{name}Query<TData = Awaited<ReturnType<typeof APEX.{name}>>, TError = Error>({params_lead}opts: Omit<UseQueryOptions<Awaited<ReturnType<typeof APEX.{name}>>, TError, TData, {key_type}>, 'queryKey' | 'queryFn'> = {{}}) {{\n"
        ));
        out.push_str("  return queryOptions({\n");
        out.push_str("    ...opts,\n");
        out.push_str(&format!("    queryKey: {key_fn}({params_arg}),\n"));
        out.push_str("    queryFn() {\n");
        out.push_str(&format!("      return APEX.{name}({params_arg});\n"));
        out.push_str("    },\n");
        out.push_str("  });\n");
        out.push_str("}\n\n");

        out.push_str(&format!("export function {key_fn}({params_def}) {{\n"));
        out.push_str(&format!("  return ['{name}'{key_tail}] as const;\n"));
        out.push_str("}\n\n");

        out.push_str(&format!(
            "export type {key_type} = ReturnType<typeof {key_fn}>;\n"
        ));
    }

    out
}

/// A schema name in type position: the name when declared, `any` when
/// absent or dangling.
fn schema_or_any(name: Option<&str>, plan: &Plan) -> String {
    match name {
        Some(name) => resolve(&FieldType::named(name), &plan.known, Target::TypeScript),
        None => "any".to_string(),
    }
}
