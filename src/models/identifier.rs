//! Разбор сегмента пути `/kitespots/{segment}`.
//!
//! Старые ссылки ведут на `/kitespots/...` и с именем спота, и с его id.
//! Сегмент, который читается как число, считается id и уводится на
//! каноничный `/kitespot/{id}`. Имя из одних цифр тоже попадёт туда.

/// Результат угадывания типа сегмента, вычисляется один раз на входе.
#[derive(Debug, Clone, PartialEq)]
pub enum SpotIdentifier {
    /// Сегмент читается как число; `raw` сохраняется как есть для редиректа.
    Numeric { raw: String, value: f64 },
    Named(String),
}

impl SpotIdentifier {
    pub fn classify(segment: &str) -> Self {
        match parse_number(segment) {
            Some(value) => SpotIdentifier::Numeric {
                raw: segment.to_string(),
                value,
            },
            None => SpotIdentifier::Named(segment.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SpotIdentifier::Numeric { raw, .. } => raw,
            SpotIdentifier::Named(name) => name,
        }
    }

    /// Путь для редиректа; `None` означает, что текущий маршрут уже каноничный.
    pub fn redirect_path(&self) -> Option<String> {
        match self {
            SpotIdentifier::Numeric { raw, .. } => Some(canonical_spot_path(raw)),
            SpotIdentifier::Named(_) => None,
        }
    }
}

/// Каноничный путь страницы спота по id.
pub fn canonical_spot_path(id: &str) -> String {
    format!("/kitespot/{}", urlencoding::encode(id))
}

/// Число по правилам `Number()` из JS: пустая строка - ноль, `Infinity` и
/// переполнение - бесконечность, `0x`/`0o`/`0b` без знака. `NaN` числом не считается.
fn parse_number(segment: &str) -> Option<f64> {
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| trimmed.strip_prefix(prefix).map(|digits| (digits, radix)));
    if let Some((digits, radix)) = radix {
        return parse_radix(digits, radix);
    }

    // f64::from_str понимает "inf", "nan" и "infinity" в любом регистре, Number() - нет
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

// Целое в системе счисления radix; длинные значения копятся в f64 без переполнения
fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}
