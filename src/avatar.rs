use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::types::UserProfile;

/// Default edge length, in pixels, of generated avatars.
pub const DEFAULT_AVATAR_SIZE: u32 = 80;

/// Builds a placeholder avatar for users without a profile picture.
///
/// A filled circle whose hue is derived from the nickname's character codes,
/// with the uppercased first character centered on it. Returned as a
/// `data:image/svg+xml;base64,...` URL; identical nicknames always produce
/// identical bytes.
#[must_use]
pub fn placeholder_avatar(nickname: &str, size: u32) -> String {
    let hue = nickname_hue(nickname);
    let glyph = nickname
        .chars()
        .next()
        .map_or_else(|| "?".to_owned(), |c| c.to_uppercase().collect());
    let half = f64::from(size) / 2.0;
    let font_size = f64::from(size) * 0.5;

    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
            r#"<circle cx="{half}" cy="{half}" r="{half}" fill="hsl({hue}, 70%, 60%)"/>"#,
            r##"<text x="{half}" y="{half}" fill="#fff" font-family="sans-serif" font-size="{font_size}" "##,
            r#"text-anchor="middle" dominant-baseline="central">{glyph}</text>"#,
            "</svg>"
        ),
        size = size,
        half = half,
        hue = hue,
        font_size = font_size,
        glyph = escape_xml(&glyph),
    );

    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Sum of the leading UTF-16 unit of every character, folded onto the color wheel.
fn nickname_hue(nickname: &str) -> u32 {
    let hash = nickname.chars().fold(0u64, |acc, c| {
        let mut units = [0u16; 2];
        acc + u64::from(c.encode_utf16(&mut units)[0])
    });
    // hash % 360 always fits
    (hash % 360) as u32
}

fn escape_xml(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_owned(),
            '<' => "&lt;".to_owned(),
            '>' => "&gt;".to_owned(),
            '"' => "&quot;".to_owned(),
            _ => c.to_string(),
        })
        .collect()
}

/// Display data for the logged-in view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    pub avatar_src: String,
    pub nickname: String,
}

impl ProfileCard {
    /// Uses the server avatar when present, otherwise a placeholder.
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        let avatar_src = match profile.avatar.as_deref() {
            Some(avatar) if !avatar.is_empty() => avatar.to_owned(),
            _ => placeholder_avatar(&profile.nickname, DEFAULT_AVATAR_SIZE),
        };
        Self {
            avatar_src,
            nickname: profile.nickname.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_svg(data_url: &str) -> String {
        let encoded = data_url
            .strip_prefix("data:image/svg+xml;base64,")
            .expect("svg data url");
        String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap()
    }

    #[test]
    fn test_placeholder_deterministic() {
        let a = placeholder_avatar("Ada", DEFAULT_AVATAR_SIZE);
        let b = placeholder_avatar("Ada", DEFAULT_AVATAR_SIZE);
        assert_eq!(a, b, "same nickname should give the same image");
    }

    #[test]
    fn test_placeholder_differs_by_nickname() {
        assert_ne!(
            placeholder_avatar("Ada", DEFAULT_AVATAR_SIZE),
            placeholder_avatar("Bob", DEFAULT_AVATAR_SIZE)
        );
    }

    #[test]
    fn test_hue_from_char_codes() {
        // 'A' + 'd' + 'a' = 65 + 100 + 97
        assert_eq!(nickname_hue("Ada"), 262);
        assert_eq!(nickname_hue(""), 0);
        // '小' = 0x5C0F = 23567, '明' = 0x660E = 26126
        assert_eq!(nickname_hue("小明"), (23567 + 26126) % 360);
    }

    #[test]
    fn test_glyph_is_uppercased_first_char() {
        let svg = decode_svg(&placeholder_avatar("ada", 80));
        assert!(svg.contains(">A</text>"), "{svg}");
        assert!(svg.contains("hsl(262, 70%, 60%)"), "{svg}");
        assert!(svg.contains(r#"font-size="40""#), "{svg}");
    }

    #[test]
    fn test_empty_nickname_uses_question_mark() {
        let svg = decode_svg(&placeholder_avatar("", 80));
        assert!(svg.contains(">?</text>"), "{svg}");
    }

    #[test]
    fn test_glyph_is_escaped() {
        let svg = decode_svg(&placeholder_avatar("<script>", 80));
        assert!(svg.contains(">&lt;</text>"), "{svg}");
    }

    #[test]
    fn test_profile_card_prefers_server_avatar() {
        let profile = UserProfile::new("Ada").with_avatar("https://cdn.example/ada.png");
        let card = ProfileCard::from_profile(&profile);
        assert_eq!(card.avatar_src, "https://cdn.example/ada.png");
        assert_eq!(card.nickname, "Ada");
    }

    #[test]
    fn test_profile_card_falls_back_to_placeholder() {
        let card = ProfileCard::from_profile(&UserProfile::new("Ada"));
        assert_eq!(card.avatar_src, placeholder_avatar("Ada", DEFAULT_AVATAR_SIZE));
    }
}
