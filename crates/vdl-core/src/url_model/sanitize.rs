//! Filename sanitization for video titles and user overrides.

/// Longest filename most filesystems accept, in bytes.
const NAME_MAX: usize = 255;

/// Characters rejected by at least one common filesystem (FAT/NTFS included,
/// since downloads often land on removable media).
fn is_forbidden(c: char) -> bool {
    matches!(c, '\0' | '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*') || c.is_control()
}

/// Sanitizes a candidate filename.
///
/// - Replaces path separators, NUL, control characters and `< > : " | ? *` with `_`
/// - Collapses consecutive underscores; inner spaces are kept
/// - Trims leading/trailing spaces, dots and underscores
/// - Limits length to 255 bytes without splitting a character
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if is_forbidden(c) {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c: char| c == '.' || c == '_' || c.is_whitespace());

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_separators() {
        assert_eq!(sanitize_filename("a/b\\c.mp4"), "a_b_c.mp4");
    }

    #[test]
    fn removes_reserved_punctuation() {
        assert_eq!(sanitize_filename("What? <Live>: \"Part 1\""), "What_ _Live_ _Part 1");
        assert_eq!(sanitize_filename("a|b*c"), "a_b_c");
    }

    #[test]
    fn trims_dots_and_spaces() {
        assert_eq!(sanitize_filename("  ..  clip.mp4  ..  "), "clip.mp4");
    }

    #[test]
    fn keeps_inner_spaces() {
        assert_eq!(sanitize_filename("My Clip"), "My Clip");
        assert_eq!(sanitize_filename("  my  video "), "my  video");
    }

    #[test]
    fn collapses_underscores() {
        assert_eq!(sanitize_filename("clip___name"), "clip_name");
    }

    #[test]
    fn control_chars() {
        assert_eq!(sanitize_filename("clip\x00\tname"), "clip_name");
    }

    #[test]
    fn keeps_unicode() {
        assert_eq!(sanitize_filename("Canción de año"), "Canción de año");
    }

    #[test]
    fn caps_length_on_char_boundary() {
        let long = "é".repeat(200);
        let s = sanitize_filename(&long);
        assert!(s.len() <= NAME_MAX);
        assert_eq!(s.len() % 2, 0);
    }
}
