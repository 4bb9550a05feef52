//! sitemap.xml for the static pages and every problem page

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate};
use log::info;

use super::problems::{Problem, load_problems};
use super::CatalogueError;

/// Calculator pages relative to the site root; "" is the home page
pub const STATIC_PAGES: [&str; 4] = ["", "integral", "limit", "directory"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
}

impl ChangeFrequency {
    fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub location: String,
    pub frequency: ChangeFrequency,
    pub priority: f64,
}

/// `base/path` without a trailing slash, so the home page is the bare base url
fn page_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{}/{}", base, path.trim_start_matches('/'))
        .trim_end_matches('/')
        .to_string()
}

pub fn sitemap_entries(base_url: &str, problems: &[Problem]) -> Vec<SitemapEntry> {
    let static_pages = STATIC_PAGES.iter().map(|page| SitemapEntry {
        location: page_url(base_url, page),
        frequency: ChangeFrequency::Daily,
        priority: 1.0,
    });
    let problem_pages = problems.iter().map(|problem| SitemapEntry {
        location: page_url(base_url, &format!("problems/{}", problem.slug)),
        frequency: ChangeFrequency::Weekly,
        priority: 0.8,
    });
    static_pages.chain(problem_pages).collect()
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn render_sitemap(entries: &[SitemapEntry], lastmod: NaiveDate) -> String {
    let date = lastmod.format("%Y-%m-%d").to_string();
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        // writing into a String cannot fail
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            xml_escape(&entry.location),
            date,
            entry.frequency.as_str(),
            entry.priority
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Reads the problem list and writes the sitemap dated today; returns the url count
pub fn write_sitemap(
    problems_file: &Path,
    sitemap_file: &Path,
    base_url: &str,
) -> Result<usize, CatalogueError> {
    let problems = load_problems(problems_file)?;
    let entries = sitemap_entries(base_url, &problems);
    let xml = render_sitemap(&entries, Local::now().date_naive());
    if let Some(parent) = sitemap_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CatalogueError::io(parent, e))?;
    }
    fs::write(sitemap_file, xml).map_err(|e| CatalogueError::io(sitemap_file, e))?;
    info!(
        "sitemap with {} urls written to {}",
        entries.len(),
        sitemap_file.display()
    );
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::problems::save_problems;

    const BASE: &str = "https://derivativecalculatorai.com";

    #[test]
    fn test_page_urls() {
        assert_eq!(page_url(BASE, ""), BASE);
        assert_eq!(page_url("https://site.org/", "limit"), "https://site.org/limit");
        assert_eq!(page_url(BASE, "problems/derivative-of-x"), format!("{BASE}/problems/derivative-of-x"));
    }

    #[test]
    fn test_entries_static_pages_first() {
        let problems = vec![Problem::derivative("x^2", ".")];
        let entries = sitemap_entries(BASE, &problems);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].location, BASE);
        assert_eq!(entries[1].location, format!("{BASE}/integral"));
        assert_eq!(entries[3].location, format!("{BASE}/directory"));
        assert_eq!(entries[0].frequency, ChangeFrequency::Daily);
        assert_eq!(entries[4].location, format!("{BASE}/problems/derivative-of-x-to-the-2"));
        assert_eq!(entries[4].frequency, ChangeFrequency::Weekly);
        assert_eq!(entries[4].priority, 0.8);
    }

    #[test]
    fn test_render() {
        let entries = vec![SitemapEntry {
            location: "https://a.org/?q=1&r=<2>".to_string(),
            frequency: ChangeFrequency::Weekly,
            priority: 0.8,
        }];
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let xml = render_sitemap(&entries, date);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://a.org/?q=1&amp;r=&lt;2&gt;</loc>"));
        assert!(xml.contains("<lastmod>2024-03-09</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_write_sitemap() {
        let dir = tempfile::tempdir().unwrap();
        let problems_file = dir.path().join("problems.json");
        let sitemap_file = dir.path().join("public").join("sitemap.xml");
        save_problems(
            &problems_file,
            &[Problem::derivative("x^2", "."), Problem::derivative("sin(x)", ".")],
        )
        .unwrap();
        let count = write_sitemap(&problems_file, &sitemap_file, BASE).unwrap();
        assert_eq!(count, 6);
        let xml = fs::read_to_string(&sitemap_file).unwrap();
        assert_eq!(xml.matches("<url>").count(), 6);
        assert!(xml.contains("/problems/derivative-of-sinx</loc>"));
    }

    #[test]
    fn test_missing_problem_list_gives_static_pages() {
        let dir = tempfile::tempdir().unwrap();
        let count = write_sitemap(
            &dir.path().join("absent.json"),
            &dir.path().join("sitemap.xml"),
            BASE,
        )
        .unwrap();
        assert_eq!(count, STATIC_PAGES.len());
    }
}
