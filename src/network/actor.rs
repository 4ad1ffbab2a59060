//! Network actor - runs service calls in Tokio async runtime

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse, Operation};
use crate::network::client::{create_client, status_of, user_message};
use crate::network::services;
use crate::storage::ClientConfig;

/// Network actor that processes service commands
pub struct NetworkActor {
    client: reqwest::Client,
    config: ClientConfig,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(
        config: ClientConfig,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
    ) -> Result<Self> {
        Ok(NetworkActor {
            client: create_client(&config)?,
            config,
            response_tx,
            active_requests: JoinSet::new(),
        })
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                        Some(cmd) => {
                            let client = self.client.clone();
                            let config = self.config.clone();
                            let response_tx = self.response_tx.clone();

                            self.active_requests.spawn(async move {
                                if let Some(response) = execute(&client, &config, cmd).await {
                                    tracing::info!(id = response.id(), "Request completed");
                                    let _ = response_tx.send(response);
                                }
                            });
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {
                    // Task completed - the response was sent by the task itself
                }
            }
        }
    }
}

fn failure(id: u64, operation: Operation, err: anyhow::Error) -> NetworkResponse {
    NetworkResponse::Error {
        id,
        operation,
        status: status_of(&err),
        message: user_message(&err),
    }
}

/// Run one command against the service wrappers
async fn execute(
    client: &reqwest::Client,
    config: &ClientConfig,
    cmd: NetworkCommand,
) -> Option<NetworkResponse> {
    let response = match cmd {
        NetworkCommand::SignIn { id, credential } => {
            match services::api_sign_in(client, config, &credential).await {
                Ok(response) => NetworkResponse::SignedIn { id, response },
                Err(e) => failure(id, Operation::SignIn, e),
            }
        }
        NetworkCommand::SignUp { id, credential } => {
            match services::api_sign_up(client, config, &credential).await {
                Ok(()) => NetworkResponse::Completed { id, operation: Operation::SignUp },
                Err(e) => failure(id, Operation::SignUp, e),
            }
        }
        NetworkCommand::ForgotPassword { id, payload } => {
            match services::api_forgot_password(client, config, &payload).await {
                Ok(()) => NetworkResponse::Completed { id, operation: Operation::ForgotPassword },
                Err(e) => failure(id, Operation::ForgotPassword, e),
            }
        }
        NetworkCommand::ResetPassword { id, payload } => {
            match services::api_reset_password(client, config, &payload).await {
                Ok(()) => NetworkResponse::Completed { id, operation: Operation::ResetPassword },
                Err(e) => failure(id, Operation::ResetPassword, e),
            }
        }
        NetworkCommand::SignOut { id, token } => {
            match services::api_sign_out(client, config, token.as_deref()).await {
                Ok(()) => NetworkResponse::Completed { id, operation: Operation::SignOut },
                Err(e) => failure(id, Operation::SignOut, e),
            }
        }
        NetworkCommand::FetchUserInfo { id, token } => {
            match services::fetch_user_info(client, config, token.as_deref()).await {
                Ok(user) => NetworkResponse::UserInfo { id, user },
                Err(e) => failure(id, Operation::UserInfo, e),
            }
        }
        NetworkCommand::FetchProfile { id, token } => {
            match services::get_settings_profile(client, config, token.as_deref()).await {
                Ok(record) => NetworkResponse::Profile { id, record },
                Err(e) => failure(id, Operation::FetchProfile, e),
            }
        }
        NetworkCommand::SaveProfile { id, record } => match services::save_profile(record).await {
            Ok(record) => NetworkResponse::ProfileSaved { id, record },
            Err(e) => failure(id, Operation::SaveProfile, e),
        },
        NetworkCommand::Shutdown => return None,
    };
    Some(response)
}
