//! Script summary cards, shared by the feed, the profile page, and the
//! post-page preview fragment.

use scripthub_types::Script;

use crate::{
    FEED_PREVIEW_CHARS, escape_attr, escape_html, format_timestamp, sanitize_url, truncate_code,
};

fn icon_html(icon: Option<&str>) -> String {
    match icon.and_then(sanitize_url) {
        Some(url) => format!(r#"<img src="{}" alt="">"#, escape_attr(&url)),
        None => "🎮".to_string(),
    }
}

fn game_or_unknown(game: Option<&str>) -> String {
    match game {
        Some(g) if !g.is_empty() => escape_html(g),
        _ => "Unknown game".to_string(),
    }
}

/// One feed card: icon, title, meta line, capped code preview, View link.
pub fn script_card(s: &Script) -> String {
    format!(
        r#"<div class="card">
  <div class="card-head">
    <div class="card-icon">{icon}</div>
    <div class="card-headings">
      <div class="card-title">{title}</div>
      <div class="card-meta">{game} &bull; {keyless} &bull; {created}</div>
    </div>
  </div>
  <pre class="card-code">{preview}</pre>
  <div class="card-actions">
    <a class="btn" href="/scripts/{id}" target="_blank">View</a>
  </div>
</div>"#,
        icon = icon_html(s.icon.as_deref()),
        title = escape_html(&s.title),
        game = game_or_unknown(s.game.as_deref()),
        keyless = s.keyless.label(),
        created = format_timestamp(s.created_at),
        preview = escape_html(&truncate_code(&s.code, FEED_PREVIEW_CHARS)),
        id = s.id,
    )
}

/// Profile variant with Edit/Delete actions and the shorter preview.
pub fn profile_card(s: &Script) -> String {
    format!(
        r#"<div class="card">
  <div class="card-head">
    <div class="card-headings">
      <div class="card-title">{title}</div>
      <div class="card-meta">{game} &bull; {keyless}</div>
    </div>
    <div class="card-actions">
      <button class="btn" data-action="edit" data-id="{id}">Edit</button>
      <button class="btn" data-action="delete" data-id="{id}">Delete</button>
    </div>
  </div>
  <pre class="card-code">{preview}</pre>
</div>"#,
        title = escape_html(&s.title),
        game = game_or_unknown(s.game.as_deref()),
        keyless = s.keyless.label(),
        id = s.id,
        preview = escape_html(&truncate_code(&s.code, crate::PROFILE_PREVIEW_CHARS)),
    )
}

/// Grid body for the feed: cards, or the no-results note when nothing
/// survived the filter.
pub fn feed_grid(scripts: &[Script]) -> String {
    if scripts.is_empty() {
        return r#"<div class="no-results" id="noResults">No scripts found.</div>"#.to_string();
    }
    scripts.iter().map(script_card).collect::<Vec<_>>().join("\n")
}

/// Grid body for the profile page.
pub fn profile_grid(scripts: &[Script]) -> String {
    if scripts.is_empty() {
        return r#"<div class="small">You haven't published any scripts yet.</div>"#.to_string();
    }
    scripts.iter().map(profile_card).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use scripthub_types::Keyless;
    use uuid::Uuid;

    fn script(title: &str, code: &str, icon: Option<&str>) -> Script {
        Script {
            id: Uuid::nil(),
            title: title.to_string(),
            code: code.to_string(),
            game: None,
            icon: icon.map(str::to_string),
            keyless: Keyless::Keyless,
            user_id: Uuid::nil(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn card_escapes_hostile_title() {
        let html = script_card(&script("<script>alert(1)</script>", "code", None));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn card_truncates_long_code_and_keeps_placeholder_icon() {
        let long = "a".repeat(1000);
        let html = script_card(&script("Long", &long, None));
        assert!(html.contains("... (truncated)"));
        assert!(!html.contains(&long));
        assert!(html.contains("🎮"));
        assert!(html.contains("Keyless"));
        assert!(html.contains("Unknown game"));
    }

    #[test]
    fn card_uses_img_only_for_valid_absolute_urls() {
        let ok = script_card(&script("T", "c", Some("https://example.com/i.png")));
        assert!(ok.contains(r#"<img src="https://example.com/i.png""#));

        let bad = script_card(&script("T", "c", Some("javascript:alert(1)")));
        assert!(!bad.contains("<img"));
        assert!(bad.contains("🎮"));
    }

    #[test]
    fn empty_feed_renders_no_results_note() {
        let html = feed_grid(&[]);
        assert!(html.contains("No scripts found"));
        assert!(!profile_grid(&[]).contains("card-title"));
    }
}
