/// URL-safe slug derivation: lowercase, Latin diacritics folded to their base
/// letters, everything outside [a-z0-9] collapsed into single hyphens, no
/// leading/trailing hyphen. Deterministic; collision handling happens at the
/// call site by suffixing a timestamp.
pub fn generate_slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_dash = false;

    for ch in text.to_lowercase().chars() {
        let mapped: &str = match ch {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
            'æ' => "ae",
            'ç' => "c",
            'è' | 'é' | 'ê' | 'ë' => "e",
            'ì' | 'í' | 'î' | 'ï' => "i",
            'ñ' => "n",
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
            'œ' => "oe",
            'ù' | 'ú' | 'û' | 'ü' => "u",
            'ý' | 'ÿ' => "y",
            'ß' => "ss",
            c if c.is_ascii_alphanumeric() => {
                out.push(c);
                prev_dash = false;
                continue;
            }
            // whitespace, underscores, punctuation all act as separators
            _ => {
                if !prev_dash && !out.is_empty() {
                    out.push('-');
                    prev_dash = true;
                }
                continue;
            }
        };

        out.push_str(mapped);
        prev_dash = false;
    }

    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(generate_slug("Mode Femme"), "mode-femme");
        assert_eq!(generate_slug("  Robes  "), "robes");
    }

    #[test]
    fn folds_diacritics_and_strips_punctuation() {
        assert_eq!(generate_slug("Électronique & Gadgets!!"), "electronique-gadgets");
        assert_eq!(generate_slug("Robes d'été"), "robes-d-ete");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(generate_slug("a__b -- c"), "a-b-c");
        assert_eq!(generate_slug("--edge--"), "edge");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(generate_slug("Top 10 Gadgets"), "top-10-gadgets");
    }

    #[test]
    fn unmappable_symbols_vanish() {
        assert_eq!(generate_slug("☃"), "");
        assert_eq!(generate_slug("café ☕ bar"), "cafe-bar");
    }
}
