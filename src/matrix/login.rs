//! Matrix client creation: fresh password login or restore of a saved one.

use log::{debug, error, info};
use matrix_sdk::{Client, ruma::OwnedUserId};

use crate::matrix::{UserCredentials, session::SessionFile};

async fn build_client(user_id: &OwnedUserId, session_file: &SessionFile) -> anyhow::Result<Client> {
    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(session_file.sqlite_path(), None)
        .build()
        .await?;

    debug!("matrix client created");
    Ok(client)
}

/// Logs in with the password and saves the login for the next start.
async fn login(
    user_credentials: &UserCredentials,
    session_file: &SessionFile,
) -> anyhow::Result<Client> {
    let user_id: OwnedUserId = user_credentials.user_id.clone().try_into()?;
    let client = build_client(&user_id, session_file).await?;

    client
        .matrix_auth()
        .login_username(&user_id, &user_credentials.password)
        .initial_device_display_name("sweepbot")
        .send()
        .await?;

    let Some(user_session) = client.matrix_auth().session() else {
        anyhow::bail!("no session after logging in as {}", user_id);
    };
    if let Err(err) = session_file.save_user_session(&user_session).await {
        error!("error persisting user session: {:?}", err);
        return Err(err.context("error persisting user session"));
    }

    info!("logged in as {}", user_id);
    Ok(client)
}

async fn restore(
    user_credentials: &UserCredentials,
    session_file: &SessionFile,
) -> anyhow::Result<Client> {
    info!("restoring matrix session from disk");

    let Some(user_session) = session_file.user_session() else {
        anyhow::bail!("no saved matrix session");
    };
    let user_id: OwnedUserId = user_credentials.user_id.clone().try_into()?;
    let client = build_client(&user_id, session_file).await?;

    client.restore_session(user_session.clone()).await?;

    info!("matrix session restored successfully");
    Ok(client)
}

/// Returns a logged in client, restoring the saved login when there is one.
pub async fn setup_client(
    user_credentials: &UserCredentials,
    session_file: &SessionFile,
) -> anyhow::Result<Client> {
    info!(
        "setting up matrix client for user {}",
        user_credentials.user_id
    );

    if session_file.has_login() {
        restore(user_credentials, session_file).await
    } else {
        login(user_credentials, session_file).await
    }
}
