// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! `transform` attribute and number list parsing

use kurbo::Affine;

/// Parse an SVG number list such as `"10,20 -5.5e2-3"`.
///
/// Numbers may be separated by whitespace, commas, or nothing at all when the
/// next number starts with a sign or a second decimal point.
pub fn parse_numbers(s: &str) -> Option<Vec<f64>> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() || c == b',' {
            i += 1;
            continue;
        }

        let start = i;
        if c == b'+' || c == b'-' {
            i += 1;
        }
        let mut seen_dot = false;
        let mut digits = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'0'..=b'9' => digits += 1,
                b'.' if !seen_dot => seen_dot = true,
                _ => break,
            }
            i += 1;
        }
        if digits == 0 {
            return None;
        }

        if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
            let mut j = i + 1;
            if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                j += 1;
            }
            let exponent_start = j;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > exponent_start {
                i = j;
            }
        }

        out.push(s[start..i].parse().ok()?);
    }

    Some(out)
}

/// Parse a transform list into a single affine map.
///
/// `"translate(10) rotate(45)"` rotates first, then translates, matching the
/// SVG composition order.
pub fn parse_transform(s: &str) -> Result<Affine, String> {
    let mut result = Affine::IDENTITY;
    let mut rest = s.trim_start_matches(|c: char| c.is_whitespace() || c == ',');

    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| format!("expected '(' in transform {:?}", s))?;
        let close = rest[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| format!("unterminated transform {:?}", s))?;

        let name = rest[..open].trim();
        let args = parse_numbers(&rest[open + 1..close])
            .ok_or_else(|| format!("bad arguments to {}()", name))?;
        result = result * transform_function(name, &args)?;

        rest = rest[close + 1..].trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    }

    Ok(result)
}

fn transform_function(name: &str, args: &[f64]) -> Result<Affine, String> {
    let arity_error = || format!("{}() does not take {} arguments", name, args.len());

    let affine = match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Affine::new([a, b, c, d, e, f]),
        ("translate", &[tx]) => Affine::translate((tx, 0.0)),
        ("translate", &[tx, ty]) => Affine::translate((tx, ty)),
        ("scale", &[s]) => Affine::scale(s),
        ("scale", &[sx, sy]) => Affine::scale_non_uniform(sx, sy),
        ("rotate", &[deg]) => Affine::rotate(deg.to_radians()),
        ("rotate", &[deg, cx, cy]) => {
            Affine::translate((cx, cy))
                * Affine::rotate(deg.to_radians())
                * Affine::translate((-cx, -cy))
        }
        ("skewX", &[deg]) => Affine::new([1.0, 0.0, deg.to_radians().tan(), 1.0, 0.0, 0.0]),
        ("skewY", &[deg]) => Affine::new([1.0, deg.to_radians().tan(), 0.0, 1.0, 0.0, 0.0]),
        ("matrix" | "translate" | "scale" | "rotate" | "skewX" | "skewY", _) => {
            return Err(arity_error())
        }
        _ => return Err(format!("unknown transform function {:?}", name)),
    };

    Ok(affine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kurbo::Point;

    fn apply(t: &str, x: f64, y: f64) -> Point {
        parse_transform(t).unwrap() * Point::new(x, y)
    }

    #[test]
    fn test_parse_numbers_compact_forms() {
        assert_eq!(
            parse_numbers("10,20 -5.5e1-3").unwrap(),
            vec![10.0, 20.0, -55.0, -3.0]
        );
        assert_eq!(parse_numbers("0.5.5").unwrap(), vec![0.5, 0.5]);
        assert_eq!(parse_numbers("").unwrap(), Vec::<f64>::new());
        assert!(parse_numbers("1 abc").is_none());
    }

    #[test]
    fn test_translate_and_scale() {
        let p = apply("translate(10, 5) scale(2)", 1.0, 1.0);
        assert_relative_eq!(p.x, 12.0);
        assert_relative_eq!(p.y, 7.0);
    }

    #[test]
    fn test_rotate_about_center() {
        let p = apply("rotate(90 10 10)", 20.0, 10.0);
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_matrix_and_skew() {
        let p = apply("matrix(1 0 0 1 3 4)", 1.0, 1.0);
        assert_eq!(p, Point::new(4.0, 5.0));

        let p = apply("skewX(45)", 0.0, 2.0);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_unknown_or_malformed() {
        assert!(parse_transform("spin(3)").is_err());
        assert!(parse_transform("scale(1 2 3)").is_err());
        assert!(parse_transform("translate(1").is_err());
    }

    #[test]
    fn test_empty_is_identity() {
        assert_eq!(parse_transform("  ").unwrap(), Affine::IDENTITY);
    }
}
