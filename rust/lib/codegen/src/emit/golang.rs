//! Go server artifacts: API structs, chi route registration grouped by
//! namespace and security requirement, and handler stubs.

use anyhow::Result;

use crate::model::{ApexDocument, FieldType};
use crate::plan::{HandlerGroup, Plan, RouteGroup};
use crate::resolve::{resolve, Target};
use crate::{Emitter, GeneratedCode, GeneratedFile};

/// Go module path of the scaffolded server tree; generated imports are
/// formed relative to it.
const MODULE_PATH: &str = "server";

pub struct GoServerEmitter;

impl Emitter for GoServerEmitter {
    fn emit(&self, doc: &ApexDocument, plan: &Plan) -> Result<GeneratedCode> {
        let mut files = vec![
            GeneratedFile {
                path: "api/types.go".to_string(),
                content: render_structs(doc, plan),
            },
            GeneratedFile {
                path: "routes/routes.go".to_string(),
                content: render_routes(&plan.route_groups),
            },
        ];

        // Handler files are grouped by namespace and fully overwritten on
        // every run; the bodies are regenerated scaffolds, not
        // hand-edited in place.
        for group in &plan.handler_groups {
            files.push(GeneratedFile {
                path: format!("handler/{}.go", group.namespace),
                content: render_handler_group(group, plan),
            });
        }

        Ok(GeneratedCode { files })
    }

    fn target(&self) -> &str {
        "go-server"
    }
}

/// One exported struct per schema. Field names are capitalized for
/// export; the original name is kept as the JSON tag so the wire shape
/// matches the client artifacts.
fn render_structs(doc: &ApexDocument, plan: &Plan) -> String {
    let mut out = String::from("package api\n\n");

    for schema in &doc.schemas {
        out.push_str(&format!("type {} struct {{\n", schema.name));
        for (field, payload) in &schema.fields {
            let ty = resolve(&FieldType::from_value(payload), &plan.known, Target::Go);
            out.push_str(&format!(
                "  {} {} `json:\"{}\"`\n",
                capitalize(field),
                ty,
                field
            ));
        }
        out.push_str("}\n\n");
    }

    out
}

/// Route registration: one function per namespace group registering open
/// routes first, then a sub-scope with the auth middleware for secured
/// routes, plus one mount function calling each group in declaration
/// order.
fn render_routes(groups: &[RouteGroup]) -> String {
    let mut out = String::from("package routes\n\n");
    out.push_str("import (\n");
    out.push_str("  \"github.com/go-chi/chi/v5\"\n\n");
    out.push_str(&format!("  \"{}/handler\"\n", MODULE_PATH));
    out.push_str(")\n\n");

    for group in groups {
        out.push_str(&format!(
            "func {}(r chi.Router, h *handler.Handler) {{\n",
            group_fn_name(&group.namespace)
        ));
        for route in &group.open {
            out.push_str(&format!(
                "  r.{}(\"{}\", h.{})\n",
                route.verb.router_method(),
                route.path,
                route.handler
            ));
        }
        if !group.secured.is_empty() {
            out.push_str("  r.Group(func(r chi.Router) {\n");
            out.push_str("    r.Use(h.AuthMiddleware)\n");
            for route in &group.secured {
                out.push_str(&format!(
                    "    r.{}(\"{}\", h.{})\n",
                    route.verb.router_method(),
                    route.path,
                    route.handler
                ));
            }
            out.push_str("  })\n");
        }
        out.push_str("}\n\n");
    }

    out.push_str("func MountRoutes(r *chi.Mux, h *handler.Handler) {\n");
    for group in groups {
        out.push_str(&format!("  {}(r, h)\n", group_fn_name(&group.namespace)));
    }
    out.push_str("}\n");

    out
}

fn group_fn_name(namespace: &str) -> String {
    format!("add{}Routes", capitalize(namespace))
}

fn render_handler_group(group: &HandlerGroup, plan: &Plan) -> String {
    let uses_api = group
        .handlers
        .iter()
        .any(|h| h.query_schema.is_some() || known_response(h.response.as_deref(), plan).is_some());

    let mut out = String::from("package handler\n\n");
    out.push_str("import (\n");
    out.push_str("  \"net/http\"\n");
    if uses_api {
        out.push_str(&format!("\n  \"{}/api\"\n", MODULE_PATH));
    }
    out.push_str(")\n");

    for handler in &group.handlers {
        out.push_str(&format!(
            "\n// {} handles {} requests to {}\n",
            handler.name,
            handler.verb.as_str(),
            handler.endpoint
        ));
        out.push_str(&format!(
            "func (h *Handler) {}(w http.ResponseWriter, r *http.Request) {{\n",
            handler.name
        ));

        if handler.secured {
            out.push_str("  userID, ok := GetUserID(r.Context())\n");
            out.push_str("  if !ok {\n");
            out.push_str("    http.Error(w, \"Unauthorized\", http.StatusUnauthorized)\n");
            out.push_str("    return\n");
            out.push_str("  }\n");
        }

        // String-only query binding; coercion is left to the implementer.
        if let Some(schema) = &handler.query_schema {
            out.push_str(&format!("\n  params := api.{}{{}}\n", schema));
            out.push_str("  query := r.URL.Query()\n");
            for field in &handler.query_fields {
                out.push_str(&format!(
                    "  params.{} = query.Get(\"{}\")\n",
                    capitalize(field),
                    field
                ));
            }
        }

        out.push_str("\n  // TODO: Implement Query Logic\n\n");
        match known_response(handler.response.as_deref(), plan) {
            Some(schema) => out.push_str(&format!("  response := api.{}{{}}\n", schema)),
            None => out.push_str("  var response interface{}\n"),
        }
        out.push_str("  h.JSON.Success(w, response)\n");
        out.push_str("}\n");
    }

    out
}

/// Response schema name when it is declared and resolvable; `None` means
/// the handler scaffolds a dynamic response value instead.
fn known_response<'a>(response: Option<&'a str>, plan: &Plan) -> Option<&'a str> {
    response.filter(|name| plan.known.contains(*name))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
