//! Client for the state.gov country fact sheet endpoint.

use routebind::{
    transport::{ReqwestTransport, Transport},
    Client, ClientConfig, Operation, Params,
};
use serde::Deserialize;

use crate::error::ClientsError;

/// Production base URL of the state facts API.
pub const STATE_DATA_BASE_URL: &str = "https://www.state.gov";

/// Errors from state facts calls. The endpoint has no structured error body.
pub type StateDataError = routebind::Error;

/// A single state record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct State {
    pub name: String,
    pub id: i64,
}

/// Response of the fact sheet listing. A missing `states` array decodes as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StateList {
    #[serde(default)]
    pub states: Vec<State>,
}

/// Typed client for the state facts API.
pub struct StateDataClient<T = ReqwestTransport> {
    client: Client<T>,
    states: Operation<StateList>,
}

impl StateDataClient {
    /// Connects to the production endpoint with default settings.
    pub fn connect() -> Result<Self, ClientsError> {
        Self::with_config(ClientConfig::new(STATE_DATA_BASE_URL))
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, ClientsError> {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientsError> {
        Self::from_client(Client::new(config)?)
    }
}

impl<T: Transport> StateDataClient<T> {
    /// Wraps an existing client and declares the state facts operations.
    pub fn from_client(client: Client<T>) -> Result<Self, ClientsError> {
        Ok(Self {
            client,
            states: Operation::parse(
                "StateData#states()",
                "GET /api/v1/?command=get_country_fact_sheets&page=0",
            )?
            .default_on_empty(),
        })
    }

    /// Fetches the first page of country fact sheets.
    pub async fn states(&self) -> Result<StateList, StateDataError> {
        self.client.call(&self.states, &Params::new()).await
    }

    /// Lists all states.
    pub async fn all_states(&self) -> Result<StateList, StateDataError> {
        self.states().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn missing_states_array_is_empty() {
        let list: StateList = serde_json::from_str("{}").unwrap();
        assert!(list.states.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let list: StateList =
            serde_json::from_str(r#"{"states":[{"id":9,"name":"Iowa","capital":"Des Moines"}]}"#)
                .unwrap();
        assert_eq!(
            list.states,
            vec![State {
                name: "Iowa".to_string(),
                id: 9
            }]
        );
    }

    #[tokio::test]
    async fn all_states_matches_states() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/"))
            .and(query_param("command", "get_country_fact_sheets"))
            .and(query_param("page", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"states": [{"id": 1, "name": "A"}]})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = StateDataClient::with_base_url(&server.uri()).unwrap();
        let states = client.states().await.unwrap();
        let all = client.all_states().await.unwrap();

        assert_eq!(
            states.states,
            vec![State {
                name: "A".to_string(),
                id: 1
            }]
        );
        assert_eq!(states, all);
    }

    #[test]
    fn client_creation_with_defaults() {
        assert!(StateDataClient::connect().is_ok());
    }

    #[test]
    fn invalid_base_url_fails_creation() {
        let err = StateDataClient::with_base_url("not a url").err().unwrap();
        assert!(matches!(
            err,
            ClientsError::StateData(StateDataError::InvalidUrl { .. })
        ));
        assert!(err.to_string().starts_with("State data error: invalid url"));
    }
}
