//! Full page templates. Each page is a self-contained document; `app.js`
//! binds to the element ids declared here.

use scripthub_types::Script;

use crate::card::feed_grid;
use crate::{escape_attr, escape_html, format_timestamp};

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} — ScriptHub</title>
  <link rel="stylesheet" href="/static/styles.css">
</head>
<body>
  <header class="topbar">
    <a class="brand" href="/">ScriptHub</a>
    <nav>
      <a class="btn" href="/">Feed</a>
      <a class="btn" href="/post">Post</a>
    </nav>
    <span id="authButtons" class="auth-buttons"></span>
  </header>
  <main class="page">
{body}
  </main>
  <script src="/static/app.js" defer></script>
</body>
</html>"#,
        title = escape_html(title),
    )
}

pub fn feed_page(scripts: &[Script], query: &str) -> String {
    let body = format!(
        r#"    <div class="toolbar">
      <input id="searchInput" type="search" placeholder="Search title, game or code…" value="{query}">
      <button id="refreshBtn" class="btn">Refresh</button>
    </div>
    <div id="cardGrid" class="grid">
{grid}
    </div>"#,
        query = escape_attr(query),
        grid = feed_grid(scripts),
    );
    layout("Feed", &body)
}

pub fn login_page() -> String {
    let body = r#"    <div class="panel">
      <h2>Log in</h2>
      <input id="loginEmail" type="email" placeholder="Email">
      <input id="loginPassword" type="password" placeholder="Password">
      <button id="loginBtn" class="btn primary">Log in</button>
      <button id="googleLoginBtn" class="btn">Continue with Google</button>
      <div id="loginMsg" class="msg"></div>
      <div class="small">No account? <a href="/signup">Sign up</a></div>
    </div>"#;
    layout("Log in", body)
}

pub fn signup_page() -> String {
    let body = r#"    <div class="panel">
      <h2>Sign up</h2>
      <input id="signupUsername" type="text" placeholder="Username">
      <input id="signupEmail" type="email" placeholder="Email">
      <input id="signupPassword" type="password" placeholder="Password">
      <button id="signupBtn" class="btn primary">Create account</button>
      <button id="signupGoogleBtn" class="btn">Continue with Google</button>
      <div id="signupMsg" class="msg"></div>
      <div class="small">Already registered? <a href="/login">Log in</a></div>
    </div>"#;
    layout("Sign up", body)
}

pub fn post_page() -> String {
    let body = r#"    <div class="post-layout">
      <div class="panel">
        <h2 id="postHeading">Post a script</h2>
        <input id="postTitle" type="text" placeholder="Title">
        <input id="postGame" type="text" placeholder="Game (optional)">
        <input id="postIcon" type="url" placeholder="Icon URL (optional)">
        <select id="postKeyless">
          <option value="no">Keyed</option>
          <option value="yes">Keyless</option>
        </select>
        <textarea id="postCode" rows="14" placeholder="Paste your script here"></textarea>
        <button id="postBtn" class="btn primary">Post script</button>
        <div id="postMsg" class="msg"></div>
      </div>
      <div id="previewPanel" class="preview"></div>
    </div>"#;
    layout("Post", body)
}

pub fn profile_page() -> String {
    let body = r#"    <div class="panel profile-head">
      <div id="pfIcon" class="icon-circle"></div>
      <div>
        <div id="pfName" class="card-title"></div>
        <div id="pfEmail" class="small"></div>
      </div>
      <button id="logoutBtn" class="btn">Log out</button>
    </div>
    <h3>Your scripts</h3>
    <div id="myScripts" class="grid"></div>
    <div class="panel">
      <h3>Change password</h3>
      <input id="changePassNew" type="password" placeholder="New password">
      <button id="changePassBtn" class="btn">Change password</button>
      <div id="profileMsg" class="msg"></div>
    </div>"#;
    layout("Profile", body)
}

/// Full detail view: the complete code body, untruncated.
pub fn detail_page(s: &Script) -> String {
    let game = s
        .game
        .as_deref()
        .filter(|g| !g.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| "Unknown".to_string());
    let body = format!(
        r#"    <a class="btn" href="/">Back</a>
    <h2>{title}</h2>
    <div class="small">Game: {game} &bull; {keyless}</div>
    <pre class="code-full">{code}</pre>
    <div class="small">Posted: {created}</div>"#,
        title = escape_html(&s.title),
        game = game,
        keyless = s.keyless.label(),
        code = escape_html(&s.code),
        created = format_timestamp(s.created_at),
    );
    layout(&s.title, &body)
}

pub fn not_found_page() -> String {
    layout(
        "Not found",
        r#"    <div class="panel"><h2>Script not found</h2>
    <div class="small">It may have been deleted by its owner.</div></div>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truncate_code;
    use chrono::{TimeZone, Utc};
    use scripthub_types::Keyless;
    use uuid::Uuid;

    #[test]
    fn detail_page_shows_full_code() {
        let code = "z".repeat(1000);
        let s = Script {
            id: Uuid::nil(),
            title: "Full view".into(),
            code: code.clone(),
            game: None,
            icon: None,
            keyless: Keyless::Keyed,
            user_id: Uuid::nil(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let html = detail_page(&s);
        assert!(html.contains(&code));
        assert!(!html.contains("(truncated)"));
        assert!(html.contains("Keyed"));
    }

    #[test]
    fn feed_page_reflects_query_and_escapes_it() {
        let html = feed_page(&[], "\"><script>");
        assert!(!html.contains("value=\"\"><script>"));
        assert!(html.contains("No scripts found"));
    }

    #[test]
    fn truncate_is_not_applied_by_layout() {
        // layout must never touch body content
        let body = "b".repeat(700);
        assert!(layout("t", &body).contains(&body));
        // and the helper itself is what pages rely on for cutting
        assert_eq!(truncate_code(&body, 400).chars().count(), 400 + "\n\n... (truncated)".chars().count());
    }
}
