use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::api::ApiClient;
use crate::types::UserData;

/// Run the interactive login flow:
/// 1. Ask the API for the provider's authorization URL (`GET /auth`)
/// 2. Open it in the system browser
/// 3. Wait for the browser to call back on localhost with `?code=<value>`
///    (skipped when the code is passed in directly)
/// 4. Exchange the code for a user (`GET /auth/callback`) and store it
pub async fn run_login(
    client: &ApiClient,
    callback_port: u16,
    code: Option<String>,
) -> Result<UserData> {
    let code = match code {
        Some(code) => code,
        None => {
            let auth_url = client
                .auth_url()
                .await
                .context("Failed to call /auth. Is the Habitus API running?")?;

            println!("Opening browser for login...");
            println!("If the browser doesn't open, visit:\n  {}\n", auth_url);
            open_browser(&auth_url);

            wait_for_callback(callback_port).await?
        }
    };

    let user = client
        .exchange_code(&code)
        .await
        .context("Failed to exchange authorization code")?;
    client.session().save_user(&user)?;
    tracing::info!(user = %user.id, "login succeeded");
    println!("Logged in as {}. Session saved.", user.name);

    Ok(user)
}

/// Open a URL in the system default browser.
fn open_browser(url: &str) {
    #[cfg(target_os = "linux")]
    let _ = std::process::Command::new("xdg-open").arg(url).spawn();
    #[cfg(target_os = "macos")]
    let _ = std::process::Command::new("open").arg(url).spawn();
    #[cfg(target_os = "windows")]
    let _ = std::process::Command::new("cmd")
        .args(["/c", "start", url])
        .spawn();
}

/// Accept one request on the callback port and return its `code` parameter.
async fn wait_for_callback(port: u16) -> Result<String> {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("Failed to bind to port {}", port))?;

    println!("Waiting for browser callback on port {}...", port);

    let (mut stream, _) = listener
        .accept()
        .await
        .context("Failed to accept connection")?;

    let mut buf = vec![0u8; 4096];
    let n = stream
        .read(&mut buf)
        .await
        .context("Failed to read from socket")?;
    let request = String::from_utf8_lossy(&buf[..n]);

    let code = parse_code(&request);
    let body = if code.is_some() {
        "<html><body><h2>Login successful!</h2><p>You can close this tab.</p></body></html>"
    } else {
        "<html><body><h2>Login failed.</h2><p>No authorization code received.</p></body></html>"
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    stream
        .write_all(response.as_bytes())
        .await
        .context("Failed to write response")?;

    code.context("Callback did not contain an authorization code. Login may have failed.")
}

/// Pull `code` out of a request line like `GET /callback?code=abc&state=x HTTP/1.1`.
fn parse_code(request: &str) -> Option<String> {
    let line = request.lines().next()?;
    let path = line.split_whitespace().nth(1)?;
    let query = path.split_once('?')?.1;
    query.split('&').find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name != "code" || value.is_empty() {
            return None;
        }
        urlencoding::decode(value).ok().map(|v| v.into_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DevBackend;
    use crate::session_store::{MemoryStore, SessionService};
    use std::sync::Arc;

    #[test]
    fn parses_code_from_request_line() {
        let request = "GET /callback?state=xyz&code=a1b2%2Bc HTTP/1.1\r\nHost: localhost\r\n\r\n";
        assert_eq!(parse_code(request).as_deref(), Some("a1b2+c"));
    }

    #[test]
    fn missing_or_empty_code_is_none() {
        assert_eq!(parse_code("GET /callback HTTP/1.1"), None);
        assert_eq!(parse_code("GET /callback?code= HTTP/1.1"), None);
        assert_eq!(parse_code("GET /callback?error=denied HTTP/1.1"), None);
    }

    #[tokio::test]
    async fn explicit_code_skips_browser_and_saves_user() {
        let session = SessionService::new(Arc::new(MemoryStore::default()), "t:userData");
        let client = ApiClient::dev(session.clone(), DevBackend::new());

        let user = run_login(&client, 0, Some("xyz".to_string()))
            .await
            .unwrap();

        assert_eq!(user.token, "dev-xyz");
        assert_eq!(session.token().as_deref(), Some("dev-xyz"));
    }
}
