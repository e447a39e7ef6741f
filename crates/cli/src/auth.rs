use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use workdeck_api::LoginRequest;
use workdeck_api_client::ApiClient;

/// Prompt for anything not given on the command line and sign in.
pub async fn run_login(client: &ApiClient, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")?;

    client
        .login(&LoginRequest {
            username: username.clone(),
            password,
        })
        .await
        .with_context(|| format!("Login to {} failed", client.base_url()))?;
    println!("Signed in to {} as {username}.", client.base_url());
    Ok(())
}

pub async fn run_logout(client: &ApiClient) -> Result<()> {
    if client.credentials().refresh_token().is_none() {
        println!("Not signed in.");
        return Ok(());
    }
    client.logout().await;
    println!("Signed out.");
    Ok(())
}
