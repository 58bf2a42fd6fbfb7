//! MCP tools: one tool per gesture on the Kundli page

use std::sync::Arc;

use rmcp::{
    RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    schemars::{self, schema_for},
    service::RequestContext,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::{HttpBackend, KundliApi};
use crate::models::AYANAMSA_CHOICES;
use crate::page::{planet_table, BirthField, GenerateOutcome, KundliPage};

/// Input for a keystroke in the city field
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct TypePlaceInput {
    #[schemars(description = "Full contents of the city field after the keystroke")]
    pub text: String,
}

/// Input for choosing a place from the dropdown
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct SelectPlaceInput {
    #[schemars(description = "Zero-based position in the current search results")]
    pub index: usize,
}

/// Input for editing one form field
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct SetBirthFieldInput {
    #[schemars(description = "Field to edit")]
    pub field: BirthField,
    #[schemars(
        description = "New value. Dates are YYYY-MM-DD, times HH:MM[:SS], gender male/female/other, timezone an hour offset such as 5.5, ayanamsa 1 (Lahiri), 3 (Raman) or 5 (Krishnamurti)"
    )]
    pub value: String,
}

/// Output style for the views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewFormat {
    #[default]
    Json,
    Text,
    /// Only meaningful for the chart
    Svg,
}

/// Input for views that can be rendered several ways
#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct ViewInput {
    #[schemars(description = "json (default), text, or svg (chart only)")]
    pub format: Option<ViewFormat>,
}

/// Input for clicking a major dasha period
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct ToggleDashaInput {
    #[schemars(description = "Zero-based position of the major period")]
    pub index: usize,
}

fn schema_to_value<T: schemars::JsonSchema>() -> Arc<serde_json::Map<String, Value>> {
    let schema = schema_for!(T);
    match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

fn empty_schema() -> Arc<serde_json::Map<String, Value>> {
    let mut map = serde_json::Map::new();
    map.insert("type".into(), Value::String("object".into()));
    map.insert("properties".into(), Value::Object(serde_json::Map::new()));
    Arc::new(map)
}

fn failure(error: impl std::fmt::Display) -> String {
    json!({
        "success": false,
        "error": error.to_string()
    })
    .to_string()
}

fn success<T: Serialize>(key: &str, value: &T) -> String {
    let mut body = serde_json::Map::new();
    body.insert("success".into(), Value::Bool(true));
    match serde_json::to_value(value) {
        Ok(value) => {
            body.insert(key.into(), value);
        }
        Err(e) => return failure(format!("Failed to serialize {}: {}", key, e)),
    }
    serde_json::to_string_pretty(&body).unwrap_or_else(failure)
}

const NO_RESULT: &str = "No Kundli generated yet. Call generate_kundli first.";

/// MCP server driving one Kundli page
pub struct JyotishServer<B: KundliApi = HttpBackend> {
    page: Arc<KundliPage<B>>,
}

impl<B: KundliApi> Clone for JyotishServer<B> {
    fn clone(&self) -> Self {
        Self {
            page: Arc::clone(&self.page),
        }
    }
}

impl<B: KundliApi> JyotishServer<B> {
    pub fn new(page: KundliPage<B>) -> Self {
        Self {
            page: Arc::new(page),
        }
    }

    fn type_place(&self, input: TypePlaceInput) -> String {
        success("search", &self.page.type_place(&input.text))
    }

    fn get_place_results(&self) -> String {
        success("search", &self.page.place_results())
    }

    fn select_place(&self, input: SelectPlaceInput) -> String {
        match self.page.select_place(input.index) {
            Ok(form) => success("form", &form),
            Err(e) => failure(e),
        }
    }

    fn set_birth_field(&self, input: SetBirthFieldInput) -> String {
        match self.page.set_field(input.field, &input.value) {
            Ok(form) => success("form", &form),
            Err(e) => failure(e),
        }
    }

    fn get_birth_form(&self) -> String {
        let ayanamsas: Vec<Value> = AYANAMSA_CHOICES
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect();
        let body = json!({
            "success": true,
            "form": self.page.form(),
            "ayanamsa_choices": ayanamsas,
        });
        serde_json::to_string_pretty(&body).unwrap_or_else(failure)
    }

    async fn generate_kundli(&self) -> String {
        match self.page.submit().await {
            GenerateOutcome::Rendered => success("page", &self.page.snapshot()),
            GenerateOutcome::Failed { error } => failure(error),
            GenerateOutcome::Ignored => failure("A Kundli is already being generated"),
        }
    }

    fn get_page_state(&self) -> String {
        let body = json!({
            "success": true,
            "status": self.page.status(),
            "form": self.page.form(),
            "search": self.page.place_results(),
        });
        serde_json::to_string_pretty(&body).unwrap_or_else(failure)
    }

    fn get_chart(&self, input: ViewInput) -> String {
        let Some(chart) = self.page.chart() else {
            return failure(NO_RESULT);
        };
        match input.format.unwrap_or_default() {
            ViewFormat::Json => success("chart", &chart),
            ViewFormat::Text => success("chart", &chart.to_text()),
            ViewFormat::Svg => success("svg", &chart.to_svg()),
        }
    }

    fn get_planet_table(&self, input: ViewInput) -> String {
        let Some(rows) = self.page.planet_table() else {
            return failure(NO_RESULT);
        };
        match input.format.unwrap_or_default() {
            ViewFormat::Text => success("planets", &planet_table::planet_table_text(&rows)),
            _ => success("planets", &rows),
        }
    }

    fn get_dasha(&self, input: ViewInput) -> String {
        if !self.page.status().has_result {
            return failure(NO_RESULT);
        }
        match (self.page.dasha(), input.format.unwrap_or_default()) {
            (Some(view), ViewFormat::Text) => success("dasha", &view.to_text()),
            (Some(view), _) => success("dasha", &view),
            (None, _) => success("dasha", &Value::Null),
        }
    }

    fn toggle_dasha(&self, input: ToggleDashaInput) -> String {
        match self.page.toggle_dasha(input.index) {
            Some(view) => success("dasha", &view),
            None => failure("No dasha periods to expand"),
        }
    }

    fn get_details(&self, input: ViewInput) -> String {
        if !self.page.status().has_result {
            return failure(NO_RESULT);
        }
        match (self.page.details(), input.format.unwrap_or_default()) {
            (Some(view), ViewFormat::Text) => success("details", &view.to_text()),
            (Some(view), _) => success("details", &view),
            (None, _) => success("details", &Value::Null),
        }
    }

    fn get_tools(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                "type_place",
                "Type into the city field. After a short pause with no further typing, places matching the text are looked up; fetch them with get_place_results.",
                schema_to_value::<TypePlaceInput>(),
            ),
            Tool::new(
                "get_place_results",
                "Get the place search dropdown: query, whether a lookup is running, and the candidates.",
                empty_schema(),
            ),
            Tool::new(
                "select_place",
                "Choose a place from the search results. Fills city, coordinates and, when it can be resolved, the UTC offset.",
                schema_to_value::<SelectPlaceInput>(),
            ),
            Tool::new(
                "set_birth_field",
                "Edit one field of the birth details form.",
                schema_to_value::<SetBirthFieldInput>(),
            ),
            Tool::new(
                "get_birth_form",
                "Get the current birth details form and the ayanamsa choices.",
                empty_schema(),
            ),
            Tool::new(
                "generate_kundli",
                "Submit the birth details form and render the resulting Kundli. A failure keeps the previous chart.",
                empty_schema(),
            ),
            Tool::new(
                "get_page_state",
                "Get loading/error state, the form and the place search dropdown.",
                empty_schema(),
            ),
            Tool::new(
                "get_chart",
                "Get the North Indian chart of the last generated Kundli as JSON, text or SVG.",
                schema_to_value::<ViewInput>(),
            ),
            Tool::new(
                "get_planet_table",
                "Get the planetary positions table: sign, direct/retrograde and degree.",
                schema_to_value::<ViewInput>(),
            ),
            Tool::new(
                "get_dasha",
                "Get the Vimshottari dasha timeline with the expanded period's sub-periods.",
                schema_to_value::<ViewInput>(),
            ),
            Tool::new(
                "toggle_dasha",
                "Click a major dasha period: expands it, or collapses it when already expanded.",
                schema_to_value::<ToggleDashaInput>(),
            ),
            Tool::new(
                "get_details",
                "Get the Avakahada/Panchang and Ghatak Chakra tables.",
                schema_to_value::<ViewInput>(),
            ),
        ]
    }
}

impl<B: KundliApi> ServerHandler for JyotishServer<B> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Jyotish Graph - Kundli page over MCP. Find the birth place with type_place and \
                 select_place, fill the rest with set_birth_field, then generate_kundli and read \
                 the chart, planet table, dasha timeline and details."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::ErrorData> {
        Ok(ListToolsResult {
            tools: self.get_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let args: Value = Value::Object(request.arguments.clone().unwrap_or_default());
        tracing::debug!(tool = %request.name, "tool call");

        let result = match request.name.as_ref() {
            "type_place" => {
                let input: TypePlaceInput = serde_json::from_value(args)
                    .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;
                self.type_place(input)
            }
            "get_place_results" => self.get_place_results(),
            "select_place" => {
                let input: SelectPlaceInput = serde_json::from_value(args)
                    .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;
                self.select_place(input)
            }
            "set_birth_field" => {
                let input: SetBirthFieldInput = serde_json::from_value(args)
                    .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;
                self.set_birth_field(input)
            }
            "get_birth_form" => self.get_birth_form(),
            "generate_kundli" => self.generate_kundli().await,
            "get_page_state" => self.get_page_state(),
            "get_chart" => {
                let input: ViewInput = serde_json::from_value(args)
                    .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;
                self.get_chart(input)
            }
            "get_planet_table" => {
                let input: ViewInput = serde_json::from_value(args)
                    .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;
                self.get_planet_table(input)
            }
            "get_dasha" => {
                let input: ViewInput = serde_json::from_value(args)
                    .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;
                self.get_dasha(input)
            }
            "toggle_dasha" => {
                let input: ToggleDashaInput = serde_json::from_value(args)
                    .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;
                self.toggle_dasha(input)
            }
            "get_details" => {
                let input: ViewInput = serde_json::from_value(args)
                    .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;
                self.get_details(input)
            }
            _ => {
                return Err(rmcp::ErrorData::invalid_params(
                    format!("Unknown tool: {}", request.name),
                    None,
                ))
            }
        };

        Ok(CallToolResult::success(vec![Content::text(result)]))
    }
}
