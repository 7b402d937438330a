/// Preview card rendering
///
/// `view` is the only place that knows about widgets: it draws a
/// `PreviewState` and fulfils its styling request by painting the card
/// background with the branding color of the current scheme.
use iced::widget::{column, container, image, svg, text, Space};
use iced::{Alignment, Background, Color, Element, Length, Theme};

use metainfo_preview::state::data::{PixelBuffer, PreviewState};

use crate::Message;

/// Edge length of the app icon on the card
const ICON_SIZE: f32 = 128.0;

/// Build the image handle once per preview, not once per frame
pub fn screenshot_handle(buffer: &PixelBuffer) -> image::Handle {
    image::Handle::from_rgba(buffer.width, buffer.height, buffer.pixels.clone())
}

/// Fulfil the card's styling request for its current scheme
///
/// Only hex literals can be painted. Any other CSS color (named,
/// `rgb()`, `hsl()`) falls back to the theme background.
pub fn background_color(preview: &PreviewState) -> Option<Color> {
    let request = preview.styling_request(preview.color_scheme)?;
    let color = parse_css_color(request.color.as_str());
    if color.is_none() {
        tracing::info!(
            css = %request.to_css(),
            "branding color is not a hex literal, using theme background"
        );
    }
    color
}

/// Draw the preview card on `background`, or the theme background if None
pub fn view<'a>(
    preview: &'a PreviewState,
    screenshot: Option<&image::Handle>,
    background: Option<Color>,
) -> Element<'a, Message> {
    let icon: Element<'a, Message> = match &preview.icon_path {
        Some(path) => svg(svg::Handle::from_path(path))
            .width(Length::Fixed(ICON_SIZE))
            .height(Length::Fixed(ICON_SIZE))
            .into(),
        None => Space::with_height(Length::Fixed(0.0)).into(),
    };

    let screenshot: Element<'a, Message> = match screenshot {
        Some(handle) => image(handle.clone()).width(Length::Fill).into(),
        None => Space::with_height(Length::Fixed(0.0)).into(),
    };

    let card = column![
        icon,
        text(preview.title.as_str()).size(40),
        text(preview.summary.as_str()).size(18),
        screenshot,
    ]
    .spacing(16)
    .padding(32)
    .align_x(Alignment::Center);

    container(card)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: background.map(Background::Color),
            ..container::Style::default()
        })
        .into()
}

/// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`
fn parse_css_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    let digits: Vec<u8> = hex
        .bytes()
        .map(|b| match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let channels: Vec<u8> = match digits.len() {
        3 | 4 => digits.iter().map(|d| d * 17).collect(),
        6 | 8 => digits.chunks(2).map(|pair| pair[0] * 16 + pair[1]).collect(),
        _ => return None,
    };

    let alpha = channels.get(3).copied().unwrap_or(255);
    Some(Color::from_rgba8(
        channels[0],
        channels[1],
        channels[2],
        f32::from(alpha) / 255.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use metainfo_preview::metainfo::{Branding, ColorScheme, ColorString};

    fn preview_with(light: &str, dark: &str) -> PreviewState {
        PreviewState {
            title: "Example".to_string(),
            subtitle: "io.github.example.metainfo.xml".to_string(),
            summary: "Do example things".to_string(),
            icon_path: None,
            screenshot: PixelBuffer {
                width: 1,
                height: 1,
                stride: 4,
                pixels: vec![0, 0, 0, 255],
            },
            color_scheme: ColorScheme::Light,
            branding: Some(Branding {
                light: ColorString::new(light),
                dark: ColorString::new(dark),
            }),
        }
    }

    #[test]
    fn test_background_follows_card_scheme() {
        let mut preview = preview_with("#ff00ff", "#993d3d");
        assert_eq!(background_color(&preview), Some(Color::from_rgb8(255, 0, 255)));

        preview.color_scheme = ColorScheme::Dark;
        assert_eq!(background_color(&preview), Some(Color::from_rgb8(0x99, 0x3d, 0x3d)));
    }

    #[test]
    fn test_named_color_falls_back_to_theme() {
        let mut preview = preview_with("rebeccapurple", "#000");
        assert_eq!(background_color(&preview), None);

        preview.color_scheme = ColorScheme::Dark;
        assert_eq!(background_color(&preview), Some(Color::from_rgb8(0, 0, 0)));

        preview.branding = None;
        assert_eq!(background_color(&preview), None);
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_css_color("#ff0000"), Some(Color::from_rgb8(255, 0, 0)));
        assert_eq!(parse_css_color("#0F0"), Some(Color::from_rgb8(0, 255, 0)));
        assert_eq!(
            parse_css_color("#00000000"),
            Some(Color::from_rgba8(0, 0, 0, 0.0))
        );
    }

    #[test]
    fn test_non_hex_colors_are_ignored() {
        assert_eq!(parse_css_color("rebeccapurple"), None);
        assert_eq!(parse_css_color("#12345"), None);
        assert_eq!(parse_css_color("#gg0000"), None);
    }
}
