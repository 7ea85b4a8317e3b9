use std::fmt::Write as _;

use card_assets::BadgeImage;
use card_stats::UserStats;

use crate::layout::{
    CardLayout, IconPosition, BADGE_ICON_SIZE, EDGE_MARGIN, AVATAR_SIZE, CARD_WIDTH,
};
use crate::text::{escape_text, group_thousands};
use crate::theme::Theme;

const FONT_STACK: &str = "'Segoe UI', Ubuntu, sans-serif";
const ERROR_CARD_HEIGHT: u32 = 100;

/// Serializes one stats card.
///
/// Fully determined by its inputs: identical arguments produce a
/// byte-identical document. All embedded images are data URIs; the output
/// references nothing external.
pub fn render_card(
    stats: &UserStats,
    total_xp: u64,
    badges: &[BadgeImage],
    avatar_uri: &str,
    theme: Theme,
    icon: IconPosition,
) -> String {
    let layout = CardLayout::new(badges.len(), icon);
    let palette = theme.palette();
    log::trace!(
        "card: rendering {} badges at {}x{}",
        badges.len(),
        layout.width,
        layout.height
    );

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
        w = layout.width,
        h = layout.height,
        font = FONT_STACK,
    );
    write_defs(&mut svg, theme, layout.avatar_x);
    let _ = write!(
        svg,
        r#"<rect width="{w}" height="{h}" rx="12" fill="{bg}"/>"#,
        w = layout.width,
        h = layout.height,
        bg = palette.background,
    );

    // Header: avatar on one side, name block on the other.
    let _ = write!(
        svg,
        r#"<image x="{x}" y="24" width="{s}" height="{s}" clip-path="url(#avatar-clip)" href="{avatar}"/>"#,
        x = layout.avatar_x,
        s = AVATAR_SIZE,
        avatar = avatar_uri,
    );
    let _ = write!(
        svg,
        r#"<text x="{x}" y="46" font-size="20" font-weight="700" fill="{color}">{name}</text>"#,
        x = layout.text_x,
        color = palette.text,
        name = escape_text(&stats.display_name),
    );
    let _ = write!(
        svg,
        r#"<text x="{x}" y="68" font-size="14" fill="{color}">@{handle}</text>"#,
        x = layout.text_x,
        color = palette.subtext,
        handle = escape_text(&stats.handle),
    );
    if stats.has_plus {
        write_plus_pill(&mut svg, layout.text_x, palette.accent);
    }

    write_stats_row(&mut svg, stats, total_xp, &palette);

    let _ = write!(
        svg,
        r#"<line x1="{x1}" y1="142" x2="{x2}" y2="142" stroke="{color}" stroke-width="1"/>"#,
        x1 = EDGE_MARGIN,
        x2 = CARD_WIDTH - EDGE_MARGIN,
        color = palette.line,
    );

    for (index, badge) in badges.iter().enumerate() {
        let (x, y) = CardLayout::badge_position(index);
        let _ = write!(
            svg,
            r#"<image x="{x}" y="{y}" width="{s}" height="{s}" preserveAspectRatio="xMidYMid meet" href="{uri}"/>"#,
            s = BADGE_ICON_SIZE,
            uri = badge.data_uri,
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Small fixed-size card carrying an error message; always well-formed
/// markup so the response stays embeddable as an image.
pub fn render_error_card(message: &str, theme: Theme) -> String {
    let palette = theme.palette();
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
        w = CARD_WIDTH,
        h = ERROR_CARD_HEIGHT,
        font = FONT_STACK,
    );
    if theme == Theme::Gradient {
        write_gradient_defs(&mut svg);
    }
    let _ = write!(
        svg,
        r#"<rect width="{w}" height="{h}" rx="12" fill="{bg}"/>"#,
        w = CARD_WIDTH,
        h = ERROR_CARD_HEIGHT,
        bg = palette.background,
    );
    let _ = write!(
        svg,
        r#"<text x="{x}" y="56" font-size="14" fill="{color}">{message}</text>"#,
        x = EDGE_MARGIN,
        color = palette.text,
        message = escape_text(message),
    );
    svg.push_str("</svg>");
    svg
}

fn write_defs(svg: &mut String, theme: Theme, avatar_x: u32) {
    svg.push_str("<defs>");
    if theme == Theme::Gradient {
        write_gradient_stops(svg);
    }
    let r = AVATAR_SIZE / 2;
    let _ = write!(
        svg,
        r#"<clipPath id="avatar-clip"><circle cx="{cx}" cy="{cy}" r="{r}"/></clipPath>"#,
        cx = avatar_x + r,
        cy = 24 + r,
    );
    svg.push_str("</defs>");
}

fn write_gradient_defs(svg: &mut String) {
    svg.push_str("<defs>");
    write_gradient_stops(svg);
    svg.push_str("</defs>");
}

fn write_gradient_stops(svg: &mut String) {
    svg.push_str(concat!(
        r#"<linearGradient id="card-bg" x1="0" y1="0" x2="1" y2="1">"#,
        r##"<stop offset="0%" stop-color="#1cb0f6"/>"##,
        r##"<stop offset="100%" stop-color="#58cc02"/>"##,
        r#"</linearGradient>"#,
    ));
}

fn write_plus_pill(svg: &mut String, x: u32, accent: &str) {
    let _ = write!(
        svg,
        r#"<rect x="{x}" y="76" width="44" height="18" rx="9" fill="{accent}"/>"#,
    );
    let _ = write!(
        svg,
        r##"<text x="{tx}" y="89" font-size="11" font-weight="700" fill="#ffffff" text-anchor="middle">PLUS</text>"##,
        tx = x + 22,
    );
}

fn write_stats_row(svg: &mut String, stats: &UserStats, total_xp: u64, palette: &crate::theme::Palette) {
    let columns = [
        (group_thousands(total_xp), "TOTAL XP"),
        (group_thousands(u64::from(stats.streak)), "DAY STREAK"),
        (group_thousands(u64::from(stats.posts)), "POSTS"),
        (group_thousands(u64::from(stats.likes)), "LIKES"),
    ];
    for (i, (value, label)) in columns.iter().enumerate() {
        let x = EDGE_MARGIN + (i as u32) * 114;
        let _ = write!(
            svg,
            r#"<text x="{x}" y="118" font-size="16" font-weight="700" fill="{color}">{value}</text>"#,
            color = palette.text,
        );
        let _ = write!(
            svg,
            r#"<text x="{x}" y="134" font-size="11" fill="{color}">{label}</text>"#,
            color = palette.subtext,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_stats::CourseEntry;

    fn sample_stats() -> UserStats {
        UserStats {
            display_name: "Duo the Owl".to_string(),
            handle: "duo".to_string(),
            streak: 365,
            has_plus: true,
            total_xp: 12345,
            posts: 12,
            likes: 3456,
            courses: vec![CourseEntry::new("es", "en", 1500)],
            picture: None,
        }
    }

    fn badge_images(count: usize) -> Vec<BadgeImage> {
        (0..count)
            .map(|i| BadgeImage {
                code: format!("l{i}"),
                data_uri: format!("data:image/svg+xml;base64,b{i}"),
            })
            .collect()
    }

    #[test]
    fn rendering_is_deterministic() {
        let stats = sample_stats();
        let badges = badge_images(12);
        let a = render_card(&stats, 9000, &badges, "data:image/png;base64,x", Theme::Dark, IconPosition::Left);
        let b = render_card(&stats, 9000, &badges, "data:image/png;base64,x", Theme::Dark, IconPosition::Left);
        assert_eq!(a, b);
    }

    #[test]
    fn user_text_is_escaped() {
        let mut stats = sample_stats();
        stats.display_name = "<script>&\"'".to_string();
        let svg = render_card(&stats, 0, &[], "data:,", Theme::Light, IconPosition::Left);
        assert!(svg.contains("&lt;script&gt;&amp;&quot;&apos;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn height_tracks_badge_rows() {
        let stats = sample_stats();
        for (count, height) in [(0, 160), (10, 190), (11, 220)] {
            let svg = render_card(&stats, 0, &badge_images(count), "data:,", Theme::Light, IconPosition::Left);
            assert!(svg.contains(&format!(r#"height="{height}""#)));
        }
    }

    #[test]
    fn badge_images_are_embedded_in_order() {
        let stats = sample_stats();
        let svg = render_card(&stats, 0, &badge_images(2), "data:,", Theme::Light, IconPosition::Left);
        let first = svg.find("b0").unwrap();
        let second = svg.find("b1").unwrap();
        assert!(first < second);
    }

    #[test]
    fn grouped_numbers_appear_on_the_card() {
        let stats = sample_stats();
        let svg = render_card(&stats, 12345, &[], "data:,", Theme::Light, IconPosition::Left);
        assert!(svg.contains(">12,345<"));
        assert!(svg.contains(">3,456<"));
    }

    #[test]
    fn gradient_theme_defines_its_paint() {
        let stats = sample_stats();
        let svg = render_card(&stats, 0, &[], "data:,", Theme::Gradient, IconPosition::Left);
        assert!(svg.contains(r#"<linearGradient id="card-bg""#));
        assert!(svg.contains(r#"fill="url(#card-bg)""#));
    }

    #[test]
    fn light_theme_omits_the_gradient() {
        let stats = sample_stats();
        let svg = render_card(&stats, 0, &[], "data:,", Theme::Light, IconPosition::Left);
        assert!(!svg.contains("linearGradient"));
    }

    #[test]
    fn icon_position_swaps_the_header() {
        let stats = sample_stats();
        let left = render_card(&stats, 0, &[], "data:,", Theme::Light, IconPosition::Left);
        let right = render_card(&stats, 0, &[], "data:,", Theme::Light, IconPosition::Right);
        assert_ne!(left, right);
        assert!(left.contains(r#"<image x="24" y="24""#));
        assert!(right.contains(&format!(
            r#"<image x="{}" y="24""#,
            CARD_WIDTH - EDGE_MARGIN - AVATAR_SIZE
        )));
    }

    #[test]
    fn error_card_escapes_the_message() {
        let svg = render_error_card("User \"x\" not found", Theme::Light);
        assert!(svg.contains("User &quot;x&quot; not found"));
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn plus_pill_only_for_plus_users() {
        let mut stats = sample_stats();
        let with = render_card(&stats, 0, &[], "data:,", Theme::Light, IconPosition::Left);
        assert!(with.contains(">PLUS<"));

        stats.has_plus = false;
        let without = render_card(&stats, 0, &[], "data:,", Theme::Light, IconPosition::Left);
        assert!(!without.contains(">PLUS<"));
    }
}
