//! HTML settings form.

use std::fmt::Write;

use crate::tribute::{TributeSettings, DEFAULT_MESSAGE};

/// Escape text for use inside HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}

/// Render the settings page for `settings`.
///
/// Unchecked checkboxes are simply absent from the submission, which the
/// save path reads as "off".
pub fn render_settings_page(settings: &TributeSettings, updated: bool) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Clacks Tribute</title></head>\n<body>\n");
    html.push_str("<div class=\"wrap\">\n<h1>X-Clacks-Overhead Tribute</h1>\n");

    if updated {
        html.push_str("<div class=\"notice\"><p>Settings saved.</p></div>\n");
    }

    html.push_str("<form method=\"post\" action=\"/admin/settings/page\">\n<table class=\"form-table\">\n");

    let _ = write!(
        html,
        "<tr><th scope=\"row\">Enable tribute header</th>\
         <td><input type=\"checkbox\" name=\"enabled\" value=\"1\"{}></td></tr>\n",
        checked(settings.enabled)
    );

    let _ = write!(
        html,
        "<tr><th scope=\"row\">Tribute text</th>\
         <td><input type=\"text\" class=\"regular-text\" name=\"message\" value=\"{}\" placeholder=\"{}\">\
         <p class=\"description\">Example: {}</p></td></tr>\n",
        escape_html(&settings.message),
        escape_html(DEFAULT_MESSAGE),
        escape_html(DEFAULT_MESSAGE),
    );

    let _ = write!(
        html,
        "<tr><th scope=\"row\">Also send hex-encoded header</th>\
         <td><input type=\"checkbox\" name=\"send_hex\" value=\"1\"{}>\
         <p class=\"description\">Sends an additional &quot;X-Clacks-Overhead-Encoded&quot; header with ASCII hex bytes.</p></td></tr>\n",
        checked(settings.send_hex),
    );

    html.push_str("</table>\n<p><input type=\"submit\" value=\"Save Changes\"></p>\n</form>\n<hr>\n");
    html.push_str(
        "<p>Adds a memorial header to all responses, in the spirit of GNU Terry Pratchett, \
         but customizable (default: Ozzy Osbourne).</p>\n",
    );
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
