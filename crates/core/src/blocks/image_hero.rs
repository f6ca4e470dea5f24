//! ImageHero block: full-width banner image with title and call to action.

use askama::Template;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{safe_url, EventView, PropReader};

/// Default banner height in pixels.
pub const DEFAULT_HEIGHT_PX: u32 = 400;
pub const MIN_HEIGHT_PX: u32 = 120;
pub const MAX_HEIGHT_PX: u32 = 1200;

/// Default darkening overlay on top of the image.
pub const DEFAULT_OVERLAY_OPACITY: f64 = 0.4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl HeroAlign {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("left") => Self::Left,
            Some("right") => Self::Right,
            _ => Self::Center,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageHeroProps {
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Clamped to `0.0..=1.0`.
    pub overlay_opacity: f64,
    pub height_px: u32,
    pub align: HeroAlign,
    pub show_cta: bool,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
}

impl Default for ImageHeroProps {
    fn default() -> Self {
        Self {
            image_url: None,
            title: None,
            subtitle: None,
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            height_px: DEFAULT_HEIGHT_PX,
            align: HeroAlign::Center,
            show_cta: false,
            cta_text: None,
            cta_url: None,
        }
    }
}

impl ImageHeroProps {
    pub fn from_props(props: &Map<String, Value>) -> Self {
        let r = PropReader(props);
        let opacity = r
            .number("overlayOpacity")
            .filter(|o| o.is_finite())
            .unwrap_or(DEFAULT_OVERLAY_OPACITY)
            .clamp(0.0, 1.0);
        let height = r
            .number("height")
            .filter(|h| h.is_finite())
            .map(|h| (h.round() as u32).clamp(MIN_HEIGHT_PX, MAX_HEIGHT_PX))
            .unwrap_or(DEFAULT_HEIGHT_PX);

        Self {
            image_url: r.text("imageUrl").map(str::to_string),
            title: r.text("title").map(str::to_string),
            subtitle: r.text("subtitle").map(str::to_string),
            overlay_opacity: opacity,
            height_px: height,
            align: HeroAlign::parse(r.text("align")),
            show_cta: r.flag("showCta", false),
            cta_text: r.text("ctaText").map(str::to_string),
            cta_url: r.text("ctaUrl").map(str::to_string),
        }
    }
}

#[derive(Template)]
#[template(path = "blocks/image_hero.html")]
struct ImageHeroHtml<'a> {
    image_url: Option<&'a str>,
    title: Option<&'a str>,
    subtitle: Option<String>,
    overlay: String,
    height_px: u32,
    align: &'a str,
    cta_text: Option<&'a str>,
    cta_url: Option<&'a str>,
}

/// Render the banner. An empty title or subtitle falls back to the event's
/// name and its dates/venue; an unsafe image or CTA URL is dropped.
pub fn render(props: &ImageHeroProps, event: &EventView) -> Result<String, askama::Error> {
    let subtitle = props.subtitle.clone().or_else(|| {
        let parts: Vec<String> = [event.date_range(), event.location.clone()]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" · "))
    });

    let image_url = props
        .image_url
        .as_deref()
        .or(event.image_url.as_deref())
        .and_then(safe_url);

    let cta = match (props.cta_text.as_deref(), props.cta_url.as_deref().and_then(safe_url)) {
        (Some(text), Some(url)) if props.show_cta => Some((text, url)),
        _ => None,
    };

    ImageHeroHtml {
        image_url,
        title: props.title.as_deref().or(event.name.as_deref()),
        subtitle,
        overlay: format!("{:.2}", props.overlay_opacity),
        height_px: props.height_px,
        align: props.align.as_str(),
        cta_text: cta.map(|(text, _)| text),
        cta_url: cta.map(|(_, url)| url),
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> ImageHeroProps {
        ImageHeroProps::from_props(value.as_object().unwrap())
    }

    #[test]
    fn opacity_and_height_are_clamped() {
        let p = props(json!({"overlayOpacity": 3.0, "height": 50}));
        assert_eq!(p.overlay_opacity, 1.0);
        assert_eq!(p.height_px, MIN_HEIGHT_PX);
        let p = props(json!({"overlayOpacity": -1, "height": "640px"}));
        assert_eq!(p.overlay_opacity, 0.0);
        assert_eq!(p.height_px, 640);
    }

    #[test]
    fn title_falls_back_to_event_name() {
        let html = render(&ImageHeroProps::default(), &EventView::mock()).unwrap();
        assert!(html.contains("Conférence annuelle"));
    }

    #[test]
    fn explicit_title_wins() {
        let html = render(&props(json!({"title": "Bienvenue"})), &EventView::mock()).unwrap();
        assert!(html.contains("Bienvenue"));
        assert!(!html.contains("Conférence annuelle"));
    }

    #[test]
    fn cta_requires_text_and_safe_url() {
        let shown = props(json!({"showCta": true, "ctaText": "Go", "ctaUrl": "/inscription"}));
        let html = render(&shown, &EventView::mock()).unwrap();
        assert!(html.contains("ev-cta"));
        assert!(html.contains("inscription"));

        let unsafe_url = props(json!({"showCta": true, "ctaText": "Go", "ctaUrl": "javascript:x()"}));
        assert!(!render(&unsafe_url, &EventView::mock()).unwrap().contains("ev-cta"));

        let hidden = props(json!({"showCta": false, "ctaText": "Go", "ctaUrl": "/x"}));
        assert!(!render(&hidden, &EventView::mock()).unwrap().contains("ev-cta"));
    }

    #[test]
    fn unsafe_image_is_dropped() {
        let html = render(
            &props(json!({"imageUrl": "https://x.test/a.png');}"})),
            &EventView::default(),
        )
        .unwrap();
        assert!(!html.contains("background-image"));
    }
}
