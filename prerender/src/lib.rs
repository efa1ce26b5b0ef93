//! Static assets derived from the ui crate at build time.
//!
//! The index page is the app shell rendered without a session. The bot it
//! shows is also embedded as JSON in the page head, which is what the
//! client hydrates from, so both always agree: with the placeholder bot the
//! API server substitutes the placeholders in both places when serving it.
//! The UIkit bundle is pruned to the icons and styles that appear in the ui
//! sources.

use anyhow::Context;
use payloads::responses::User;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

pub const BOT_ID: &str = "(BOT_ID)";
pub const BOT_NAME: &str = "(BOT_NAME)";
pub const BOT_AVATAR: &str = "(BOT_AVATAR)";

/// Styles every page needs regardless of which classes it names.
pub const BASELINE_STYLES: [&str; 6] =
    ["variables", "mixin", "base", "utility", "inverse", "nav"];

static BODY_RE: OnceLock<Regex> = OnceLock::new();
static ICON_RE: OnceLock<Regex> = OnceLock::new();
static LESS_IMPORT_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("bad pattern {pattern}: {error}"))
    })
}

pub fn placeholder_bot() -> User {
    User {
        id: BOT_ID.into(),
        username: BOT_NAME.into(),
        discriminator: 0,
        avatar: Some(BOT_AVATAR.into()),
        bot: true,
    }
}

/// Render the app at `path` the way it looks before any request settles.
pub async fn render_app(path: String, bot: User) -> String {
    yew::ServerRenderer::<ui::ServerApp>::with_props(move || {
        ui::ServerAppProps {
            path: path.into(),
            bot: Some(bot),
        }
    })
    .render()
    .await
}

/// The script tag `ui::inline_bot` reads the bot from.
pub fn inline_bot_script(bot: &User) -> anyhow::Result<String> {
    // a literal `</script>` in a name would end the tag early
    let json = serde_json::to_string(bot)?.replace("</", "<\\/");
    Ok(format!(
        r#"<script type="{}">{json}</script>"#,
        ui::INLINE_BOT_TYPE
    ))
}

/// Fill in the template: `head` goes right before `</head>`, and everything
/// from the first `<body>` to the last `</body>` is replaced with `body`.
pub fn render_index(
    template: &str,
    head: &str,
    body: &str,
) -> anyhow::Result<String> {
    let body_re = compiled(&BODY_RE, r"(?s)<body>.*</body>");
    anyhow::ensure!(body_re.is_match(template), "template has no <body>");
    let head_end = template
        .find("</head>")
        .context("template has no </head>")?;

    let html = format!(
        "{}{head}\n{}",
        &template[..head_end],
        &template[head_end..]
    );
    let body = format!("<body>{body}</body>");
    Ok(body_re
        .replace(&html, regex::NoExpand(&body))
        .into_owned())
}

/// Icons named by `uk-icon="NAME"` attributes.
pub fn icon_names(source: &str) -> Vec<String> {
    compiled(&ICON_RE, r#"uk-icon="([^"]+)""#)
        .captures_iter(source)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Modules listed by `@import "NAME.less";` lines of a UIkit import file.
pub fn less_imports(source: &str) -> Vec<String> {
    compiled(&LESS_IMPORT_RE, r#"@import "([^.]+)\.less";"#)
        .captures_iter(source)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// The baseline styles plus every candidate named as `uk-NAME` in one of
/// `sources`, with a character other than `a-z` on either side.
pub fn used_styles<S: AsRef<str>>(
    sources: &[S],
    candidates: &[String],
) -> anyhow::Result<HashSet<String>> {
    let mut used: HashSet<String> =
        BASELINE_STYLES.iter().map(|name| name.to_string()).collect();
    for name in candidates {
        let pattern = format!("[^a-z]uk-{}[^a-z]", regex::escape(name));
        let mention = Regex::new(&pattern)?;
        if sources.iter().any(|source| mention.is_match(source.as_ref())) {
            used.insert(name.clone());
        }
    }
    Ok(used)
}

/// Keep the first occurrence of each name.
fn dedup(names: &[String]) -> Vec<&String> {
    let mut seen = HashSet::new();
    names.iter().filter(|name| seen.insert(*name)).collect()
}

/// Module registering the given `(name, svg)` icons with UIkit.
pub fn icons_script(icons: &[(String, String)]) -> String {
    let mut seen = HashSet::new();
    let entries: Vec<String> = icons
        .iter()
        .filter(|(name, _)| seen.insert(name))
        .map(|(name, svg)| {
            format!(
                "    {}: {},",
                serde_json::Value::from(name.as_str()),
                serde_json::Value::from(svg.as_str())
            )
        })
        .collect();
    format!(
        "import UIkit from 'uikit';\nUIkit.icon.add({{\n{}\n}});\n",
        entries.join("\n")
    )
}

/// LESS entry point importing the used components, then the used themes, in
/// UIkit's own order.
pub fn style_sheet(
    components: &[String],
    themes: &[String],
    used: &HashSet<String>,
) -> String {
    let imports = |names: &[String], kind: &str| -> Vec<String> {
        dedup(names)
            .into_iter()
            .filter(|name| used.contains(*name))
            .map(|name| {
                format!("@import \"uikit/src/less/{kind}/{name}.less\";")
            })
            .collect()
    };
    let mut lines = imports(components, "components");
    lines.extend(imports(themes, "theme"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    const TEMPLATE: &str = "<html><head><title>x</title></head>\
        <body>\n<p>old</p>\n</body>\n</html>";

    #[test]
    fn head_and_body_are_filled_in() {
        let html =
            render_index(TEMPLATE, "<script></script>", "<div>new</div>")
                .unwrap();
        assert_eq!(
            html,
            "<html><head><title>x</title><script></script>\n</head>\
             <body><div>new</div></body>\n</html>"
        );
    }

    #[test]
    fn body_is_inserted_literally() {
        let body = "<a href=\"$1\">$0</a>";
        let html = render_index(TEMPLATE, "", body).unwrap();
        assert!(html.contains("<body><a href=\"$1\">$0</a></body>"));
    }

    #[test]
    fn template_without_body_or_head_is_an_error() {
        assert!(render_index("<html></html>", "", "x").is_err());
        assert!(render_index("</body><body>", "", "x").is_err());
        assert!(render_index("<body></body>", "", "x").is_err());
    }

    #[test]
    fn inline_bot_script_holds_the_bot() {
        let bot = User {
            username: "</script><b>".into(),
            ..placeholder_bot()
        };
        let script = inline_bot_script(&bot).unwrap();

        let json = script
            .strip_prefix(r#"<script type="application/x-bot-user+json">"#)
            .and_then(|rest| rest.strip_suffix("</script>"))
            .unwrap();
        assert!(!json.contains("</"));
        let parsed: User = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, bot);
    }

    #[test]
    fn icons_are_read_from_attributes() {
        let source = r#"
            <span uk-icon="sign-out"></span>
            <a uk-icon="home" href="/"></a>
            <span uk-icon=""></span>
            <span uk-icon="sign-out"></span>
        "#;
        assert_eq!(
            icon_names(source),
            strings(&["sign-out", "home", "sign-out"])
        );
    }

    #[test]
    fn less_imports_skip_other_lines() {
        let source = "// Base\n@import \"variables.less\";\n\
            @import \"mixin.less\";\n// @import url(x);\n\
            @import \"navbar.less\";\n";
        assert_eq!(
            less_imports(source),
            strings(&["variables", "mixin", "navbar"])
        );
    }

    #[test]
    fn styles_need_word_boundaries() {
        let candidates =
            strings(&["nav", "navbar", "card", "alert", "icon", "text"]);
        let source = r#"<nav class="uk-navbar-container">
            <div class="uk-card uk-card-default">"#;
        let used = used_styles(&[source], &candidates).unwrap();

        assert!(used.contains("navbar"));
        assert!(used.contains("card"));
        assert!(!used.contains("alert"));
        // uk-icon only appears in the other source
        assert!(!used.contains("icon"));
        for name in BASELINE_STYLES {
            assert!(used.contains(name));
        }

        let sources = [source, r#"<span uk-icon="x">"#];
        let used = used_styles(&sources, &candidates).unwrap();
        assert!(used.contains("icon"));
    }

    #[test]
    fn style_at_the_very_start_is_not_matched() {
        let used = used_styles(&["uk-card "], &strings(&["card"])).unwrap();
        assert!(!used.contains("card"));
    }

    #[test]
    fn style_sheet_keeps_uikit_order() {
        let components =
            strings(&["variables", "card", "nav", "navbar", "card"]);
        let themes = strings(&["card", "alert"]);
        let used: HashSet<String> =
            strings(&["navbar", "variables", "card", "nav"])
                .into_iter()
                .collect();

        assert_eq!(
            style_sheet(&components, &themes, &used),
            [
                "@import \"uikit/src/less/components/variables.less\";",
                "@import \"uikit/src/less/components/card.less\";",
                "@import \"uikit/src/less/components/nav.less\";",
                "@import \"uikit/src/less/components/navbar.less\";",
                "@import \"uikit/src/less/theme/card.less\";",
            ]
            .join("\n")
        );
    }

    #[test]
    fn icons_script_registers_each_icon_once() {
        let icons = vec![
            ("sign-out".to_string(), "<svg a=\"1\"/>".to_string()),
            ("sign-out".to_string(), "<svg/>".to_string()),
        ];
        let script = icons_script(&icons);
        assert!(script.starts_with("import UIkit from 'uikit';"));
        assert_eq!(script.matches("\"sign-out\"").count(), 1);
        assert!(script.contains(r#""<svg a=\"1\"/>""#));
    }

    #[tokio::test]
    async fn shell_renders_placeholder_bot() {
        let html = render_app("/".into(), placeholder_bot()).await;
        assert!(html.contains(BOT_NAME));
        assert!(html.contains(&format!("avatars/{BOT_ID}/{BOT_AVATAR}.webp")));
        assert!(html.contains("uk-navbar"));
        assert!(!html.contains("Redirecting"));
    }

    #[tokio::test]
    async fn shell_shows_the_bot_the_client_hydrates_with() {
        let bot = placeholder_bot();
        let script = inline_bot_script(&bot).unwrap();
        let json = script
            .split_once('>')
            .and_then(|(_, rest)| rest.strip_suffix("</script>"))
            .unwrap();
        let inline: User = serde_json::from_str(json).unwrap();

        let shell = render_app("/".into(), bot).await;
        assert!(shell.contains(&inline.username));
        assert_eq!(shell, render_app("/".into(), inline).await);
    }
}
