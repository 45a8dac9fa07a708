//! Numeric style values.

/// Properties whose numeric values carry no implicit length unit.
const UNITLESS: &[&str] = &[
    "animationIterationCount",
    "aspectRatio",
    "borderImageOutset",
    "borderImageSlice",
    "borderImageWidth",
    "boxFlex",
    "boxFlexGroup",
    "boxOrdinalGroup",
    "columnCount",
    "columns",
    "flex",
    "flexGrow",
    "flexPositive",
    "flexShrink",
    "flexNegative",
    "flexOrder",
    "fontWeight",
    "gridArea",
    "gridColumn",
    "gridColumnEnd",
    "gridColumnSpan",
    "gridColumnStart",
    "gridRow",
    "gridRowEnd",
    "gridRowSpan",
    "gridRowStart",
    "lineClamp",
    "lineHeight",
    "opacity",
    "order",
    "orphans",
    "scale",
    "tabSize",
    "widows",
    "zIndex",
    "zoom",
    "fillOpacity",
    "floodOpacity",
    "stopOpacity",
    "strokeDasharray",
    "strokeDashoffset",
    "strokeMiterlimit",
    "strokeOpacity",
    "strokeWidth",
];

pub fn is_unitless(property: &str) -> bool {
    UNITLESS.contains(&property)
}

/// Render `number` for `property` (camel-cased), appending `px` unless the
/// property is unitless.
pub fn maybe_add_px(property: &str, number: f64) -> String {
    let rendered = format_number(number);
    if is_unitless(property) {
        rendered
    } else {
        format!("{rendered}px")
    }
}

/// Format a number the way JavaScript's `String(n)` does for the values that
/// show up in style tables.
pub fn format_number(number: f64) -> String {
    if number.is_nan() {
        return "NaN".to_string();
    }
    if number.is_infinite() {
        return if number > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = number.abs();
    if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
        let exponential = format!("{number:e}");
        return match exponential.split_once('e') {
            Some((digits, exponent)) if !exponent.starts_with('-') => format!("{digits}e+{exponent}"),
            _ => exponential,
        };
    }
    if number.fract() == 0.0 {
        if magnitude < 9.0e15 {
            return format!("{}", number as i64);
        }
        return format!("{number:.0}");
    }
    format!("{number}")
}

/// Parse a JavaScript numeric literal (`1.5`, `.5`, `1_000`, `0x1f`, `1e3`).
pub fn parse_number(literal: &str) -> Option<f64> {
    let cleaned = literal.replace('_', "");
    let lower = cleaned.to_ascii_lowercase();
    let radix = |prefix: &str, radix: u32| {
        lower
            .strip_prefix(prefix)
            .and_then(|digits| u64::from_str_radix(digits, radix).ok())
            .map(|n| n as f64)
    };
    if lower.starts_with("0x") {
        return radix("0x", 16);
    }
    if lower.starts_with("0o") {
        return radix("0o", 8);
    }
    if lower.starts_with("0b") {
        return radix("0b", 2);
    }
    lower.parse::<f64>().ok()
}
