use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, bail};

use crate::quote::{PageFormat, QuoteSettings, SellerProfile};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub guest_cart_ttl: Duration,
    pub renderer_bin: String,
    pub assembler_bin: String,
    /// Scratch space for page images and assembled files.
    pub render_work_dir: PathBuf,
    pub quote: QuoteSettings,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("APP_PORT", 3000)?;

        let defaults = QuoteSettings::default();
        let margin_mm = parse_var("QUOTE_MARGIN_MM", defaults.page_format.margin_mm)?;
        let page_format = PageFormat::A4.with_margin(margin_mm);
        if !page_format.is_valid() {
            bail!("QUOTE_MARGIN_MM={margin_mm} leaves no room on an A4 page");
        }
        let items_per_page = parse_var("QUOTE_ITEMS_PER_PAGE", defaults.items_per_page)?;
        if items_per_page == 0 {
            bail!("QUOTE_ITEMS_PER_PAGE must be at least 1");
        }
        let render_scale = check_render_scale(parse_var("QUOTE_RENDER_SCALE", defaults.render_scale)?)?;
        let terms = match env::var("QUOTE_TERMS") {
            Ok(raw) => raw
                .split('|')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => defaults.terms,
        };

        let quote = QuoteSettings {
            items_per_page,
            page_format,
            render_scale,
            currency_symbol: env::var("QUOTE_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            date_format: env::var("QUOTE_DATE_FORMAT").unwrap_or(defaults.date_format),
            validity_days: parse_var("QUOTE_VALIDITY_DAYS", defaults.validity_days)?,
            terms,
            seller: seller_from_env(defaults.seller),
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            guest_cart_ttl: Duration::from_secs(parse_var("GUEST_CART_TTL_SECS", 604_800)?),
            renderer_bin: env::var("QUOTE_RENDERER_BIN")
                .unwrap_or_else(|_| "wkhtmltoimage".to_string()),
            assembler_bin: env::var("QUOTE_ASSEMBLER_BIN").unwrap_or_else(|_| "img2pdf".to_string()),
            render_work_dir: env::var("QUOTE_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            quote,
        })
    }

    /// Defaults for everything except the database, for tests and tooling.
    pub fn local(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            jwt_secret: "local-dev-secret".to_string(),
            guest_cart_ttl: Duration::from_secs(604_800),
            renderer_bin: "wkhtmltoimage".to_string(),
            assembler_bin: "img2pdf".to_string(),
            render_work_dir: env::temp_dir(),
            quote: QuoteSettings::default(),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value `{raw}`")),
        Err(_) => Ok(default),
    }
}

/// The scale multiplies pixel sizes, so it must be a finite positive number.
fn check_render_scale(scale: f64) -> anyhow::Result<f64> {
    if !scale.is_finite() || scale <= 0.0 {
        bail!("QUOTE_RENDER_SCALE must be a finite positive number (got {scale})");
    }
    Ok(scale)
}

fn seller_from_env(defaults: SellerProfile) -> SellerProfile {
    let text = |name: &str, fallback: String| env::var(name).unwrap_or(fallback);
    let optional = |name: &str, fallback: Option<String>| {
        env::var(name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or(fallback)
    };

    SellerProfile {
        name: text("SELLER_NAME", defaults.name),
        tagline: text("SELLER_TAGLINE", defaults.tagline),
        tax_id: text("SELLER_TAX_ID", defaults.tax_id),
        whatsapp_display: text("SELLER_WHATSAPP_DISPLAY", defaults.whatsapp_display),
        whatsapp_number: text("SELLER_WHATSAPP_NUMBER", defaults.whatsapp_number),
        website: text("SELLER_WEBSITE", defaults.website),
        email: text("SELLER_EMAIL", defaults.email),
        contact_person: text("SELLER_CONTACT_PERSON", defaults.contact_person),
        signatory_title: text("SELLER_SIGNATORY_TITLE", defaults.signatory_title),
        logo_url: optional("SELLER_LOGO_URL", defaults.logo_url),
        signature_url: optional("SELLER_SIGNATURE_URL", defaults.signature_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_scale_must_be_finite_and_positive() {
        assert_eq!(check_render_scale(2.0).unwrap(), 2.0);
        for bad in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            assert!(check_render_scale(bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn nan_scale_parses_as_a_float() {
        // "NaN" is valid f64 syntax, so the range check alone would let it through.
        let parsed: f64 = "NaN".parse().unwrap();
        assert!(check_render_scale(parsed).is_err());
    }
}
