//! Turns backend property records into an HTML fragment for the results
//! region. Every field is defaulted independently, and every interpolated
//! value is escaped: scraped text is display text, never markup.

use crate::format::{format_date, format_price};
use crate::model::Property;

/// Renders the full results region fragment.
pub fn render_results(properties: &[Property]) -> String {
    if properties.is_empty() {
        return "<p>Aucun résultat trouvé</p>".to_string();
    }

    let mut html = format!(
        "<h3>{} résultats trouvés</h3>\n<div class=\"results-list\">\n",
        properties.len()
    );
    for property in properties {
        html.push_str(&render_item(property));
    }
    html.push_str("</div>");
    html
}

fn render_item(property: &Property) -> String {
    let title = escape_html(property.title.as_deref().unwrap_or("Sans titre"));

    // Zero is a real price; only a missing value gets the placeholder.
    let price = property
        .price
        .map(format_price)
        .unwrap_or_else(|| "N/A".to_string());

    let surface = property
        .surface
        .map(|s| {
            if s.fract() == 0.0 {
                format!("{}m²", s as i64)
            } else {
                format!("{s}m²")
            }
        })
        .unwrap_or_else(|| "N/A".to_string());

    let (dpe, dpe_class) = match property.dpe.as_deref() {
        Some(grade) => (
            escape_html(grade),
            format!("dpe-{}", escape_html(&grade.to_lowercase())),
        ),
        None => ("N/A".to_string(), "dpe-na".to_string()),
    };

    let source = escape_html(property.source.as_deref().unwrap_or("Inconnu"));
    let badge = badge_token(property.source.as_deref().unwrap_or("Unknown"));

    let location = escape_html(property.location.as_deref().unwrap_or("Non spécifiée"));

    let date = property
        .posted_date
        .map(format_date)
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "<div class=\"result-item card\">\n\
         <strong>{title}</strong><br>\n\
         Prix: {price} | Surface: {surface} | DPE: <span class=\"dpe {dpe_class}\">{dpe}</span><br>\n\
         Zone: {location} | Publié: {date}<br>\n\
         Source: <span class=\"badge badge-{badge}\">{source}</span>\n\
         </div>\n"
    )
}

/// Badge class token: lowercased, whitespace runs collapsed to hyphens.
fn badge_token(source: &str) -> String {
    let mut token = String::with_capacity(source.len());
    for c in source.to_lowercase().chars() {
        if c.is_whitespace() {
            if !token.ends_with('-') {
                token.push('-');
            }
        } else {
            token.push(c);
        }
    }
    escape_html(&token)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
