//! Login and end-to-end encryption setup.
//!
//! The bot must be able to read encrypted rooms and write to encrypted direct
//! chats, so its device has to be cross-signed and its secrets recoverable.
//!
//! # First run
//!
//! 1. Log in with the password
//! 2. Bootstrap cross-signing, answering the interactive auth with the password
//! 3. Enable recovery protected by the passphrase, unless a backup already exists
//! 4. Recover the secrets and save the login tokens
//!
//! # Later runs
//!
//! The saved tokens are restored and the secrets imported from secret storage.

use anyhow::{Context, anyhow, bail};
use log::{debug, info};
use matrix_sdk::{
    Client,
    encryption::{
        BackupDownloadStrategy, EncryptionSettings,
        recovery::{RecoveryError, RecoveryState},
    },
    ruma::{OwnedUserId, api::client::uiaa},
};

use crate::matrix::{UserCredentials, store::SessionStore};

const DEVICE_NAME: &str = "undercover bot";

/// Returns a logged-in client with working encryption.
///
/// Restores the saved session when there is one, logs in otherwise.
pub async fn connect(
    credentials: &UserCredentials,
    store: &SessionStore,
) -> anyhow::Result<Client> {
    info!("connecting matrix account {}", credentials.user_id);

    let client = match store.user_session().await {
        Some(user_session) => {
            info!("restoring saved matrix session");
            let client = build_client(credentials, store).await?;
            client.restore_session(user_session).await?;

            client
                .encryption()
                .secret_storage()
                .open_secret_store(&credentials.passphrase)
                .await
                .context("failed to open secret storage")?
                .import_secrets()
                .await
                .context("failed to import secrets")?;
            client
        }
        None => first_login(credentials, store).await?,
    };

    check_encryption(&client).await?;
    info!("matrix client ready");

    Ok(client)
}

async fn build_client(
    credentials: &UserCredentials,
    store: &SessionStore,
) -> anyhow::Result<Client> {
    let user_id: OwnedUserId = credentials.user_id.as_str().try_into()?;

    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(store.sqlite_path(), Some(&credentials.passphrase))
        .with_encryption_settings(EncryptionSettings {
            auto_enable_cross_signing: true,
            backup_download_strategy: BackupDownloadStrategy::default(),
            auto_enable_backups: true,
        })
        .build()
        .await?;

    debug!("matrix client built for {}", user_id);
    Ok(client)
}

async fn first_login(
    credentials: &UserCredentials,
    store: &SessionStore,
) -> anyhow::Result<Client> {
    let client = build_client(credentials, store).await?;

    client
        .matrix_auth()
        .login_username(&credentials.user_id, &credentials.password)
        .initial_device_display_name(DEVICE_NAME)
        .send()
        .await?;
    debug!("logged in as {}", credentials.user_id);

    bootstrap_cross_signing(&client, credentials).await?;
    enable_recovery(&client, &credentials.passphrase).await?;

    client
        .encryption()
        .recovery()
        .recover(&credentials.passphrase)
        .await
        .context("failed to recover secrets")?;
    debug!("secrets recovered");

    let user_session = client
        .matrix_auth()
        .session()
        .ok_or_else(|| anyhow!("no session after login"))?;
    store
        .save_user_session(&user_session)
        .await
        .context("failed to save user session")?;

    Ok(client)
}

async fn bootstrap_cross_signing(
    client: &Client,
    credentials: &UserCredentials,
) -> anyhow::Result<()> {
    let Err(e) = client
        .encryption()
        .bootstrap_cross_signing_if_needed(None)
        .await
    else {
        debug!("cross signing already set up");
        return Ok(());
    };

    // The server asks for the password before uploading signing keys
    let Some(response) = e.as_uiaa_response() else {
        bail!("failed to bootstrap cross signing: {:?}", e);
    };
    let mut password = uiaa::Password::new(
        uiaa::UserIdentifier::UserIdOrLocalpart(credentials.user_id.clone()),
        credentials.password.clone(),
    );
    password.session = response.session.clone();

    client
        .encryption()
        .bootstrap_cross_signing(Some(uiaa::AuthData::Password(password)))
        .await?;

    debug!("cross signing set up");
    Ok(())
}

async fn enable_recovery(client: &Client, passphrase: &str) -> anyhow::Result<()> {
    match client
        .encryption()
        .recovery()
        .enable()
        .with_passphrase(passphrase)
        .await
    {
        Ok(_) => debug!("recovery enabled"),
        Err(RecoveryError::BackupExistsOnServer) => debug!("recovery already enabled"),
        Err(e) => bail!("failed to enable recovery: {:?}", e),
    }

    Ok(())
}

async fn check_encryption(client: &Client) -> anyhow::Result<()> {
    if client.encryption().recovery().state() != RecoveryState::Enabled {
        bail!("recovery is not enabled");
    }

    let device = client
        .encryption()
        .get_own_device()
        .await?
        .ok_or_else(|| anyhow!("own device not found"))?;
    if !device.is_verified() {
        bail!("device is not verified");
    }

    Ok(())
}
