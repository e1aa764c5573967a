//! Rendering of the locked HTML document.
//!
//! The caller's body must contain an element with id `unlockButton`.
//! The rendered page keeps that button disabled until the runtime fires
//! `lit-ready`, then wires it to toggle the lock. Decrypted content is
//! swapped into `mediaGridHolder` and `lockedHeader` shows the state.

use litdoc_core::EmbeddedState;

/// Element id of the unlock control.
pub const UNLOCK_BUTTON_ID: &str = "unlockButton";
/// Element id of the region that receives unlocked content.
pub const CONTENT_REGION_ID: &str = "mediaGridHolder";
/// Element id of the LOCKED/UNLOCKED header.
pub const HEADER_ID: &str = "lockedHeader";
/// Event fired by the runtime once its dependencies are loaded.
pub const READY_EVENT: &str = "lit-ready";

/// Runtime script loaded by every document when none is configured.
pub const DEFAULT_RUNTIME_SCRIPT_URL: &str = "https://jscdn.litgateway.com/index.web.js";

/// A generated locked document.
#[derive(Debug, Clone, PartialEq)]
pub struct LitDocument {
    /// The full HTML text.
    pub html: String,
    /// The runtime state embedded in `html`.
    pub state: EmbeddedState,
}

/// Everything the renderer needs, already resolved and canonicalized.
pub(crate) struct DocumentParts<'a> {
    pub title: &'a str,
    pub css: &'a str,
    pub html_body: &'a str,
    pub script_tags: &'a str,
    pub runtime_script_url: &'a str,
    pub state: &'a EmbeddedState,
}

/// Render the document HTML.
pub(crate) fn render(parts: &DocumentParts<'_>) -> String {
    let state = parts.state;
    let conditions = serde_json::to_string(&state.access_control_conditions)
        .expect("JSON values always serialize");

    format!(
        r#"
<!DOCTYPE html>
<html>
  <head>
    <title>{title}</title>
    <style>
      html, body, #root {{
        height: 100%;
      }}
    </style>
    <style id="jss-server-side">{css}</style>
    {script_tags}
    <script>
      var encryptedZipDataUrl = {bundle_url}
      var accessControlConditions = {conditions}
      var chain = {chain}
      var encryptedSymmetricKey = {gated_key}
      var locked = {locked}
      var useLitPostMessageProxy = {use_proxy}

      document.addEventListener('{ready}', function(){{
        var unlockButton = document.getElementById('{button}')
        if (unlockButton) {{
          unlockButton.disabled = false
        }}

        var loadingSpinner = document.getElementById('loadingSpinner')
        if (loadingSpinner) {{
          loadingSpinner.style = 'display: none;'
        }}

        var loadingText = document.getElementById('loadingText')
        if (loadingText){{
          loadingText.innerText = ''
        }}
      }})
    </script>
    <script onload='LitJsSdk.litJsSdkLoadedInALIT()' src="{runtime}"></script>
  </head>
  <body>
    <div id="root">{body}</div>
    <script>
      var unlockButton = document.getElementById('{button}')
      unlockButton.onclick = function() {{
        LitJsSdk.toggleLock()
      }}
      unlockButton.disabled = true
    </script>
  </body>
</html>
  "#,
        title = escape_html(parts.title),
        css = parts.css,
        script_tags = parts.script_tags,
        bundle_url = js_string(&state.encrypted_zip_data_url),
        conditions = script_safe(&conditions),
        chain = js_string(&state.chain),
        gated_key = js_string(&state.encrypted_symmetric_key),
        locked = state.locked,
        use_proxy = state.use_lit_post_message_proxy,
        ready = READY_EVENT,
        button = UNLOCK_BUTTON_ID,
        runtime = escape_html(parts.runtime_script_url),
        body = parts.html_body,
    )
}

/// A `<script>` tag loading an inline asset.
pub(crate) fn script_tag(data_url: &str) -> String {
    format!("<script src=\"{}\"></script>\n", escape_html(data_url))
}

/// Quote a string as a JavaScript literal that cannot close the script block.
fn js_string(value: &str) -> String {
    let quoted = serde_json::to_string(value).expect("strings always serialize");
    script_safe(&quoted)
}

fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_state() -> EmbeddedState {
        EmbeddedState {
            encrypted_zip_data_url: "data:application/octet-stream;base64,AAEC".into(),
            access_control_conditions: vec![json!({ "operator": "</script>" })],
            chain: "ethereum".into(),
            encrypted_symmetric_key: "deadbeef".into(),
            locked: true,
            use_lit_post_message_proxy: false,
        }
    }

    fn render_sample(title: &str) -> String {
        let state = sample_state();
        render(&DocumentParts {
            title,
            css: ".x { color: red; }",
            html_body: "<button id=\"unlockButton\">Unlock</button>",
            script_tags: "",
            runtime_script_url: DEFAULT_RUNTIME_SCRIPT_URL,
            state: &state,
        })
    }

    #[test]
    fn test_embeds_runtime_state() {
        let html = render_sample("My LIT");

        assert!(html.contains(
            "var encryptedZipDataUrl = \"data:application/octet-stream;base64,AAEC\""
        ));
        assert!(html.contains("var chain = \"ethereum\""));
        assert!(html.contains("var encryptedSymmetricKey = \"deadbeef\""));
        assert!(html.contains("var locked = true"));
        assert!(html.contains("var useLitPostMessageProxy = false"));
        assert!(html.contains("var accessControlConditions = [{\"operator\":\"<\\/script>\"}]"));
    }

    #[test]
    fn test_button_disabled_until_ready() {
        let html = render_sample("t");
        assert!(html.contains("document.addEventListener('lit-ready'"));
        assert!(html.contains("unlockButton.disabled = true"));
        assert!(html.contains("LitJsSdk.toggleLock()"));
        assert!(html.contains(DEFAULT_RUNTIME_SCRIPT_URL));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render_sample("<b>Tom & Jerry</b>");
        assert!(html.contains("<title>&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</title>"));
    }

    #[test]
    fn test_script_tag() {
        assert_eq!(
            script_tag("data:text/javascript;base64,AA=="),
            "<script src=\"data:text/javascript;base64,AA==\"></script>\n"
        );
    }
}
