//! Diacritic folding shared by slugs and location search.

/// Base letter of a lowercase accented letter; other characters pass
/// through unchanged.
pub(crate) fn fold_char(ch: char) -> char {
    match ch {
        'ă' | 'â' | 'á' | 'à' | 'ä' => 'a',
        'î' | 'í' | 'ï' => 'i',
        'ș' | 'ş' => 's',
        'ț' | 'ţ' => 't',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'ó' | 'ö' | 'ô' => 'o',
        'ú' | 'ü' | 'û' => 'u',
        other => other,
    }
}

/// Lowercases `text` and folds its diacritics, so `Mănăstirea` and
/// `MANASTIREA` compare equal.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(fold_char)
        .collect()
}
