//! Debug index page: links to the other debug endpoints plus a log-level form.

use std::fmt::Write;

use crate::logger::LogLevel;

const LEVELS: [LogLevel; 4] = [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error];

#[derive(Debug, Clone)]
pub struct Page {
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct IndexPage {
    pages: Vec<Page>,
}

impl IndexPage {
    pub fn add_page(&mut self, path: &'static str, description: &'static str) {
        self.pages.push(Page { path, description });
    }

    pub fn render(&self, current: Option<LogLevel>) -> String {
        let mut links = String::new();
        for p in &self.pages {
            let _ = writeln!(
                links,
                r#"        <li><a href="{path}">{path}</a>&nbsp;&nbsp;{desc}</li>"#,
                path = p.path,
                desc = p.description,
            );
        }

        let mut options = String::new();
        for level in LEVELS {
            let selected = if Some(level) == current { " selected" } else { "" };
            let _ = writeln!(
                options,
                r#"            <option value="{value}"{selected}>{label}</option>"#,
                value = level.as_str(),
                label = level.as_str().to_ascii_uppercase(),
            );
        }

        format!(
            r#"<html>
<title>Chat Service Debug</title>
<body>
    <h2>Chat Service Debug</h2>
    <ul>
{links}    </ul>

    <h2>Log Level</h2>
    <form onSubmit="putLogLevel()">
        <select id="log-level-select">
{options}        </select>
        <input type="submit" value="Change"></input>
    </form>

    <script>
        function putLogLevel() {{
            const req = new XMLHttpRequest();
            req.open('PUT', '/log/level', false);
            req.setRequestHeader('Content-Type', 'application/x-www-form-urlencoded');
            req.setRequestHeader('Accept', 'application/json');
            req.onload = function() {{ window.location.reload(); }};
            req.send('level=' + document.getElementById('log-level-select').value);
        }};
    </script>
</body>
</html>
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_links_and_marks_current_level() {
        let mut index = IndexPage::default();
        index.add_page("/version", "Get build information");

        let html = index.render(Some(LogLevel::Warn));
        assert!(html.contains(r#"<a href="/version">/version</a>&nbsp;&nbsp;Get build information"#));
        assert!(html.contains(r#"<option value="warn" selected>WARN</option>"#));
        assert!(html.contains(r#"<option value="info">INFO</option>"#));
    }
}
