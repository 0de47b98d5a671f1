//! Axum HTTP handlers for GraphQL endpoints.
//!
//! This module provides the HTTP handlers for GraphQL requests:
//! - `POST /graphql` - JSON request body
//! - `GET /graphql` - query via URL params, or the GraphiQL page when no
//!   query is given and the playground is enabled

use async_graphql::dynamic::Schema;
use async_graphql::http::GraphiQLSource;
use async_graphql::{Request, Response, Variables};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse};
use autocrud_storage::DynRecordStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::GraphQLContextBuilder;
use crate::error::GraphQLError;

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// State shared across GraphQL handlers.
#[derive(Clone)]
pub struct GraphQLState {
    /// Executable schema.
    pub schema: Schema,

    /// Store handed to every request's context.
    pub store: DynRecordStore,

    /// Whether `GET /graphql` without a query serves GraphiQL.
    pub playground: bool,
}

/// GraphQL request body.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest {
    /// The GraphQL query string.
    pub query: String,

    /// Optional operation name for multi-operation documents.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables for the query.
    pub variables: Option<serde_json::Value>,
}

/// Query parameters for GET requests.
#[derive(Debug, Deserialize)]
pub struct GraphQLQueryParams {
    /// The GraphQL query string.
    pub query: Option<String>,

    /// Optional operation name.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables (JSON string).
    pub variables: Option<String>,
}

/// GraphQL response body.
#[derive(Debug, Serialize)]
pub struct GraphQLResponse {
    pub data: serde_json::Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl From<Response> for GraphQLResponse {
    fn from(resp: Response) -> Self {
        let data = resp.data.into_json().unwrap_or(serde_json::Value::Null);

        let errors = resp
            .errors
            .into_iter()
            .map(|e| {
                let mut error_obj = serde_json::json!({ "message": e.message });

                if !e.locations.is_empty() {
                    error_obj["locations"] =
                        serde_json::to_value(&e.locations).unwrap_or(serde_json::Value::Null);
                }
                if !e.path.is_empty() {
                    error_obj["path"] =
                        serde_json::to_value(&e.path).unwrap_or(serde_json::Value::Null);
                }
                if let Some(extensions) = &e.extensions {
                    error_obj["extensions"] =
                        serde_json::to_value(extensions).unwrap_or(serde_json::Value::Null);
                }

                error_obj
            })
            .collect();

        Self {
            data,
            errors,
            extensions: if resp.extensions.is_empty() {
                None
            } else {
                Some(serde_json::to_value(&resp.extensions).unwrap_or(serde_json::Value::Null))
            },
        }
    }
}

pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Json(request): Json<GraphQLRequest>,
) -> impl IntoResponse {
    debug!("Processing GraphQL request");
    execute_graphql(state, &headers, request).await.into_response()
}

pub async fn graphql_handler_get(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Query(params): Query<GraphQLQueryParams>,
) -> impl IntoResponse {
    if params.query.is_none() {
        if state.playground {
            return Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response();
        }
        return error_response(GraphQLError::InvalidQuery("missing 'query' parameter".into()))
            .into_response();
    }

    let request = match params_to_request(params) {
        Ok(req) => req,
        Err(e) => {
            return error_response(GraphQLError::InvalidQuery(e.to_string())).into_response();
        }
    };

    debug!("Processing GraphQL GET request");
    execute_graphql(state, &headers, request).await.into_response()
}

async fn execute_graphql(
    state: GraphQLState,
    headers: &HeaderMap,
    request: GraphQLRequest,
) -> impl IntoResponse {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);

    let context = match GraphQLContextBuilder::new()
        .with_store(state.store.clone())
        .with_request_id(&request_id)
        .build()
    {
        Ok(ctx) => ctx,
        Err(e) => {
            return error_response(GraphQLError::Internal(e.to_string())).into_response();
        }
    };

    let mut gql_request = Request::new(&request.query);

    if let Some(op_name) = request.operation_name {
        gql_request = gql_request.operation_name(op_name);
    }

    if let Some(vars) = request.variables {
        gql_request = gql_request.variables(Variables::from_json(vars));
    }

    gql_request = gql_request.data(context);

    debug!(request_id = %request_id, query = %request.query, "Executing GraphQL query");
    let response = state.schema.execute(gql_request).await;

    if response.is_err() {
        warn!(
            request_id = %request_id,
            errors = response.errors.len(),
            "GraphQL request completed with errors"
        );
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(GraphQLResponse::from(response)),
    )
        .into_response()
}

/// Converts GET query params to a GraphQL request.
fn params_to_request(params: GraphQLQueryParams) -> Result<GraphQLRequest, serde_json::Error> {
    let variables = if let Some(vars_str) = params.variables {
        Some(serde_json::from_str(&vars_str)?)
    } else {
        None
    };

    Ok(GraphQLRequest {
        query: params.query.unwrap_or_default(),
        operation_name: params.operation_name,
        variables,
    })
}

/// Returns an error response.
fn error_response(error: GraphQLError) -> impl IntoResponse {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error.to_response_body()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_request_deserialize() {
        let json = r#"{
            "query": "{ listUsers { id } }",
            "operationName": "Users",
            "variables": {"foo": "bar"}
        }"#;

        let request: GraphQLRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.query, "{ listUsers { id } }");
        assert_eq!(request.operation_name, Some("Users".to_string()));
        assert!(request.variables.is_some());
    }

    #[test]
    fn test_graphql_request_minimal() {
        let json = r#"{"query": "{ _health }"}"#;

        let request: GraphQLRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.query, "{ _health }");
        assert!(request.operation_name.is_none());
        assert!(request.variables.is_none());
    }

    #[test]
    fn test_params_to_request() {
        let params = GraphQLQueryParams {
            query: Some("{ _health }".to_string()),
            operation_name: Some("GetHealth".to_string()),
            variables: Some(r#"{"foo": "bar"}"#.to_string()),
        };

        let request = params_to_request(params).unwrap();
        assert_eq!(request.query, "{ _health }");
        assert_eq!(request.operation_name, Some("GetHealth".to_string()));
        assert!(request.variables.is_some());
    }

    #[test]
    fn test_params_to_request_invalid_variables() {
        let params = GraphQLQueryParams {
            query: Some("{ _health }".to_string()),
            operation_name: None,
            variables: Some("not valid json".to_string()),
        };

        assert!(params_to_request(params).is_err());
    }

    #[test]
    fn test_response_keeps_error_extensions() {
        let error = async_graphql::ServerError::new("boom", None);
        let mut response = Response::new(async_graphql::Value::Null);
        response.errors.push(error);

        let body = GraphQLResponse::from(response);
        assert_eq!(body.data, serde_json::Value::Null);
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0]["message"], "boom");
    }
}
