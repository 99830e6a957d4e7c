//! User input prompts and interactions

use anyhow::{Context, Result};

/// Ask for the Jira domain when the configuration leaves it empty
pub fn prompt_domain() -> Result<String> {
    let domain: String = cliclack::input("Jira domain name (https://[yourname].atlassian.net)")
        .placeholder("https://yourname.atlassian.net")
        .interact()
        .context("Failed to read Jira domain")?;
    Ok(domain)
}

/// Ask for the Jira username
pub fn prompt_username() -> Result<String> {
    let username: String =
        cliclack::input("Enter your Jira username").interact().context("Failed to read Jira username")?;
    Ok(username)
}

/// Ask for the API token, masked
pub fn prompt_api_token() -> Result<String> {
    let api_token = cliclack::password("Enter your Jira API token")
        .mask('*')
        .interact()
        .context("Failed to read Jira API token")?;
    Ok(api_token)
}
