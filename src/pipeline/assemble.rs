//! Asset assembly: pure string construction of the viewer documents.
//!
//! The three documents are deterministic functions of (page count, title,
//! search payload, viewer options): identical inputs reproduce byte-identical
//! output, which packaging round-trip tests rely on. No filesystem access,
//! no network, no clock — the only embedded version marker is the crate
//! version, a compile-time constant.
//!
//! Image references follow the bundle contract shared with the packager:
//! `files/pages/{ordinal}.jpg` and `files/thumb/{ordinal}.jpg`, 1-based.

use crate::config::ViewerOptions;
use crate::output::{Assets, SearchData};
use crate::templates;
use std::fmt::Write as _;

/// Cache-busting marker appended to asset URLs. Compile-time constant, so
/// the assembler stays deterministic.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the HTML, CSS and JS documents for a converted book.
///
/// `download_file` is the bundle-relative name of the source PDF; the
/// download button is emitted only when both the option is enabled and a
/// file name is present.
pub fn assemble(
    page_count: usize,
    title: &str,
    search: Option<&SearchData>,
    options: &ViewerOptions,
    download_file: Option<&str>,
) -> Assets {
    let search_enabled = options.search && search.is_some();
    let download_enabled = options.download_button && download_file.is_some();

    Assets {
        html: render_html(
            page_count,
            title,
            search.filter(|_| options.search),
            options,
            download_file.filter(|_| options.download_button),
        ),
        css: templates::VIEWER_CSS.to_string(),
        js: render_js(options, search_enabled, download_enabled),
    }
}

/// Compose the viewer script from the core and the enabled feature snippets.
fn render_js(options: &ViewerOptions, search: bool, download: bool) -> String {
    let mut js = String::from(templates::VIEWER_JS_CORE);
    if options.zoom_panel {
        js.push_str(templates::VIEWER_JS_ZOOM);
    }
    if search {
        js.push_str(templates::VIEWER_JS_SEARCH);
    }
    if options.sidebar_menu {
        js.push_str(templates::VIEWER_JS_MENU);
    }
    if download {
        js.push_str(templates::VIEWER_JS_DOWNLOAD);
    }
    js
}

fn render_html(
    page_count: usize,
    title: &str,
    search: Option<&SearchData>,
    options: &ViewerOptions,
    download_file: Option<&str>,
) -> String {
    let escaped_title = html_escape::encode_text(title);
    let mut html = String::with_capacity(4096 + page_count * 96);

    html.push_str("<!DOCTYPE html>\n<html lang=\"cs\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no\">\n",
    );
    let _ = writeln!(html, "    <title>{escaped_title}</title>");
    let _ = writeln!(
        html,
        "    <link rel=\"stylesheet\" href=\"css/style.css?v={VERSION}\">"
    );
    if page_count > 0 {
        html.push_str("    <link rel=\"icon\" href=\"files/thumb/1.jpg\" type=\"image/jpeg\">\n");
    }
    html.push_str(
        "    <link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css\">\n",
    );
    let _ = writeln!(html, "    <!-- pdf2flipbook v{VERSION} -->");
    html.push_str("</head>\n<body>\n    <div id=\"flipbook-container\">\n");

    render_toolbar(&mut html, page_count, search.is_some(), options, download_file);

    // Viewer surface.
    html.push_str(concat!(
        "        <div id=\"flipbook-viewer\">\n",
        "            <button id=\"prev-btn\" class=\"nav-btn\" aria-label=\"Previous page\">\u{2039}</button>\n",
        "            <div id=\"page-container\"></div>\n",
        "            <button id=\"next-btn\" class=\"nav-btn\" aria-label=\"Next page\">\u{203A}</button>\n",
        "        </div>\n",
    ));

    // Thumbnail strip.
    html.push_str("        <div id=\"thumbnail-bar\">\n            <div id=\"thumbnail-container\">\n");
    for ordinal in 1..=page_count {
        let _ = writeln!(
            html,
            "                <img src=\"files/thumb/{ordinal}.jpg\" class=\"thumbnail\" data-page=\"{ordinal}\" alt=\"Page {ordinal}\">"
        );
    }
    html.push_str("            </div>\n        </div>\n    </div>\n");

    if search.is_some() {
        html.push_str(concat!(
            "    <div id=\"search-overlay\" class=\"overlay\" style=\"display: none;\">\n",
            "        <div class=\"overlay-content\">\n",
            "            <h2>Search</h2>\n",
            "            <input type=\"text\" id=\"search-input\" placeholder=\"Search the document\u{2026}\">\n",
            "            <div id=\"search-results\"></div>\n",
            "            <button id=\"search-close-btn\">Close</button>\n",
            "        </div>\n",
            "    </div>\n",
        ));
    }

    if options.sidebar_menu {
        html.push_str(concat!(
            "    <div id=\"menu-overlay\" class=\"overlay\" style=\"display: none;\">\n",
            "        <div class=\"overlay-content\">\n",
            "            <h2>Pages</h2>\n",
            "            <ul id=\"menu-list\">\n",
        ));
        for ordinal in 1..=page_count {
            let _ = writeln!(
                html,
                "                <li><a href=\"#\" data-page=\"{ordinal}\">Page {ordinal}</a></li>"
            );
        }
        html.push_str(concat!(
            "            </ul>\n",
            "            <button id=\"menu-close-btn\">Close</button>\n",
            "        </div>\n",
            "    </div>\n",
        ));
    }

    // Inline globals consumed by js/flipbook.js.
    html.push_str("    <script>\n");
    let _ = writeln!(html, "        const totalPages = {page_count};");
    if let Some(file) = download_file {
        let _ = writeln!(
            html,
            "        const pdfFileName = \"{}\";",
            html_escape::encode_double_quoted_attribute(file)
        );
    }
    if let Some(data) = search {
        // Same serialisation as search_data.json, so the embedded and
        // sibling copies always carry the identical mapping.
        let _ = writeln!(html, "        const searchData = {};", data.to_json());
    }
    html.push_str("    </script>\n");
    let _ = writeln!(html, "    <script src=\"js/flipbook.js?v={VERSION}\"></script>");
    html.push_str("</body>\n</html>\n");

    html
}

fn render_toolbar(
    html: &mut String,
    page_count: usize,
    has_search: bool,
    options: &ViewerOptions,
    download_file: Option<&str>,
) {
    html.push_str("        <div id=\"flipbook-toolbar\">\n");

    if options.zoom_panel {
        push_button(html, "zoom-in-btn", "Zoom in", "fa-plus", false);
        push_button(html, "zoom-out-btn", "Zoom out", "fa-minus", false);
    }
    if has_search {
        push_button(html, "search-btn", "Search", "fa-magnifying-glass", false);
    }
    if options.sidebar_menu {
        push_button(html, "menu-btn", "Pages", "fa-bars", false);
    }
    push_button(html, "prev-page-btn", "Previous", "fa-chevron-left", false);
    push_button(html, "next-page-btn", "Next", "fa-chevron-right", false);

    let _ = writeln!(
        html,
        "            <div id=\"page-info\"><span id=\"current-page\">1</span> / {page_count}</div>"
    );

    push_button(html, "first-page-btn", "First page", "fa-backward-step", false);
    push_button(html, "last-page-btn", "Last page", "fa-forward-step", false);
    push_button(html, "fullscreen-btn", "Fullscreen", "fa-expand", false);
    if download_file.is_some() {
        push_button(html, "download-btn", "Download PDF", "fa-download", false);
    }
    if options.ai_summary_stub {
        // Placeholder until the summary service exists; rendered disabled.
        push_button(html, "ai-summary-btn", "Summary (coming soon)", "fa-wand-magic-sparkles", true);
    }

    html.push_str("        </div>\n");
}

fn push_button(html: &mut String, id: &str, title: &str, icon: &str, disabled: bool) {
    let disabled_attr = if disabled { " disabled" } else { "" };
    let _ = writeln!(
        html,
        "            <button id=\"{id}\" class=\"toolbar-btn\" title=\"{title}\"{disabled_attr}><i class=\"fas {icon}\"></i></button>"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PageText;
    use std::collections::BTreeMap;

    fn sample_search() -> SearchData {
        let mut texts = BTreeMap::new();
        texts.insert(1, PageText::Recognized("obsah čísla".into()));
        texts.insert(2, PageText::Recognized("druhá strana".into()));
        SearchData::from_page_texts(&texts)
    }

    #[test]
    fn assembly_is_byte_deterministic() {
        let options = ViewerOptions::default();
        let search = sample_search();
        let a = assemble(12, "Zpravodaj 09/2025", Some(&search), &options, None);
        let b = assemble(12, "Zpravodaj 09/2025", Some(&search), &options, None);
        assert_eq!(a.html, b.html);
        assert_eq!(a.css, b.css);
        assert_eq!(a.js, b.js);
    }

    #[test]
    fn html_references_every_thumbnail() {
        let assets = assemble(3, "Test", None, &ViewerOptions::default(), None);
        for ordinal in 1..=3 {
            assert!(assets
                .html
                .contains(&format!("files/thumb/{ordinal}.jpg")));
        }
        assert!(!assets.html.contains("files/thumb/4.jpg"));
        assert!(assets.html.contains("const totalPages = 3;"));
    }

    #[test]
    fn zero_page_document_still_renders() {
        let assets = assemble(0, "Empty", None, &ViewerOptions::default(), None);
        assert!(assets.html.contains("const totalPages = 0;"));
        assert!(assets.html.contains("</html>"));
        // No thumbnail exists to use as favicon.
        assert!(!assets.html.contains("rel=\"icon\""));
    }

    #[test]
    fn title_is_escaped() {
        let assets = assemble(
            1,
            "<script>alert('x')</script>",
            None,
            &ViewerOptions::default(),
            None,
        );
        assert!(!assets.html.contains("<script>alert"));
        assert!(assets.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn search_payload_is_embedded_verbatim() {
        let search = sample_search();
        let assets = assemble(2, "T", Some(&search), &ViewerOptions::default(), None);
        assert!(assets.html.contains(&format!(
            "const searchData = {};",
            search.to_json()
        )));
        assert!(assets.js.contains("performSearch"));
    }

    #[test]
    fn disabled_search_omits_overlay_and_script() {
        let options = ViewerOptions {
            search: false,
            ..ViewerOptions::default()
        };
        let search = sample_search();
        let assets = assemble(2, "T", Some(&search), &options, None);
        assert!(!assets.html.contains("search-overlay"));
        assert!(!assets.html.contains("const searchData"));
        assert!(!assets.js.contains("performSearch"));
    }

    #[test]
    fn download_button_requires_file_and_option() {
        let mut options = ViewerOptions::default();
        options.download_button = true;

        let with = assemble(1, "T", None, &options, Some("zpravodaj.pdf"));
        assert!(with.html.contains("download-btn"));
        assert!(with.html.contains("const pdfFileName = \"zpravodaj.pdf\";"));

        let without_file = assemble(1, "T", None, &options, None);
        assert!(!without_file.html.contains("download-btn"));

        options.download_button = false;
        let without_option = assemble(1, "T", None, &options, Some("zpravodaj.pdf"));
        assert!(!without_option.html.contains("download-btn"));
    }

    #[test]
    fn ai_summary_stub_is_disabled_button() {
        let options = ViewerOptions {
            ai_summary_stub: true,
            ..ViewerOptions::default()
        };
        let assets = assemble(1, "T", None, &options, None);
        assert!(assets.html.contains("id=\"ai-summary-btn\""));
        assert!(assets.html.contains("disabled"));
    }
}
