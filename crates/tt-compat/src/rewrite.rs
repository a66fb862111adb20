//! The three built-in rewrites of spec §4.8, each a pair `(semver_range,
//! transform)` applied in listed order against a flat token sequence. Every
//! transform tracks the `"` string toggle itself so it never touches tokens
//! inside a quoted-string span.

use semver::Version;

/// `<1.9.0-alpha.1`: older clients don't understand `attribute:name`, so
/// drop the whole `attribute:name[:ty] = <value>` clause. The value is
/// either a single entity-placeholder token or an inline `" ... "` span.
fn strip_device_name(seq: &mut Vec<String>, target: &Version) {
    let threshold = Version::parse("1.9.0-alpha.1").expect("valid semver literal");
    if *target >= threshold {
        return;
    }
    let mut out = Vec::with_capacity(seq.len());
    let mut in_string = false;
    let mut i = 0;
    while i < seq.len() {
        let tok = &seq[i];
        if tok == "\"" {
            in_string = !in_string;
            out.push(tok.clone());
            i += 1;
            continue;
        }
        if !in_string && tok.starts_with("attribute:name") && seq.get(i + 1).map(String::as_str) == Some("=") {
            i = skip_attribute_value(seq, i + 2);
            continue;
        }
        out.push(tok.clone());
        i += 1;
    }
    *seq = out;
}

/// Past the `=`, the value is one placeholder token or a `" ... "` span;
/// returns the index just past it.
fn skip_attribute_value(seq: &[String], start: usize) -> usize {
    if seq.get(start).map(String::as_str) == Some("\"") {
        let mut j = start + 1;
        while j < seq.len() && seq[j] != "\"" {
            j += 1;
        }
        j + 1
    } else {
        start + 1
    }
}

/// `<1.9.3`: the `defaultTemperature` unit was introduced after this
/// version; fall back to Fahrenheit for clients that predate it.
fn default_temperature_unit(seq: &mut [String], target: &Version) {
    let threshold = Version::parse("1.9.3").expect("valid semver literal");
    if *target >= threshold {
        return;
    }
    let mut in_string = false;
    for tok in seq.iter_mut() {
        if tok == "\"" {
            in_string = !in_string;
            continue;
        }
        if !in_string && tok == "unit:defaultTemperature" {
            *tok = "unit:F".to_string();
        }
    }
}

/// `<1.11.0-alpha.1`: the `unit:$<code>` currency shorthand postdates this
/// version; expand `<number> unit:$<code>` into the explicit `new Currency
/// ( <number> , unit:<code> )` call form.
fn currency_syntax(seq: &mut Vec<String>, target: &Version) {
    let threshold = Version::parse("1.11.0-alpha.1").expect("valid semver literal");
    if *target >= threshold {
        return;
    }
    let mut out = Vec::with_capacity(seq.len());
    let mut in_string = false;
    let mut i = 0;
    while i < seq.len() {
        let tok = &seq[i];
        if tok == "\"" {
            in_string = !in_string;
            out.push(tok.clone());
            i += 1;
            continue;
        }
        let code = (!in_string)
            .then(|| seq.get(i + 1))
            .flatten()
            .and_then(|next| next.strip_prefix("unit:$"));
        if let Some(code) = code {
            out.push("new".to_string());
            out.push("Currency".to_string());
            out.push("(".to_string());
            out.push(tok.clone());
            out.push(",".to_string());
            out.push(format!("unit:{code}"));
            out.push(")".to_string());
            i += 2;
            continue;
        }
        out.push(tok.clone());
        i += 1;
    }
    *seq = out;
}

/// Applies all built-in rewrites, in the fixed order spec §4.8 lists them,
/// each gated on `target` predating the version that introduced the syntax
/// it strips. The set is closed: no plug-in mechanism.
pub fn apply(sequence: &mut Vec<String>, target: &Version) {
    strip_device_name(sequence, target);
    default_temperature_unit(sequence, target);
    currency_syntax(sequence, target);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn device_name_clause_is_dropped_before_1_9_0_alpha_1() {
        let mut tokens = seq(&[
            "now", "=>", "@light-bulb.set_power",
            "attribute:name:String", "=", "\"", "kitchen", "\"",
            "param:power:Enum(on,off)", "=", "enum:off",
        ]);
        let target = Version::parse("1.8.0").unwrap();
        apply(&mut tokens, &target);
        assert_eq!(
            tokens,
            seq(&["now", "=>", "@light-bulb.set_power", "param:power:Enum(on,off)", "=", "enum:off"])
        );
    }

    #[test]
    fn device_name_clause_survives_on_or_after_threshold() {
        let mut tokens = seq(&["@a.b", "attribute:name", "=", "GENERIC_ENTITY_tt:device_0"]);
        let target = Version::parse("1.9.0-alpha.1").unwrap();
        apply(&mut tokens, &target);
        assert_eq!(tokens, seq(&["@a.b", "attribute:name", "=", "GENERIC_ENTITY_tt:device_0"]));
    }

    #[test]
    fn default_temperature_unit_is_rewritten_to_fahrenheit() {
        let mut tokens = seq(&["param:value:Measure(C)", "=", "NUMBER_0", "unit:defaultTemperature"]);
        let target = Version::parse("1.9.0").unwrap();
        apply(&mut tokens, &target);
        assert_eq!(tokens, seq(&["param:value:Measure(C)", "=", "NUMBER_0", "unit:F"]));
    }

    #[test]
    fn quoted_text_matching_a_rewrite_token_is_left_alone() {
        let mut tokens = seq(&["\"", "unit:defaultTemperature", "\""]);
        let target = Version::parse("1.9.0").unwrap();
        apply(&mut tokens, &target);
        assert_eq!(tokens, seq(&["\"", "unit:defaultTemperature", "\""]));
    }

    #[test]
    fn currency_pair_expands_to_new_currency_call() {
        let mut tokens = seq(&["param:price:Currency", "=", "NUMBER_0", "unit:$usd"]);
        let target = Version::parse("1.10.0").unwrap();
        apply(&mut tokens, &target);
        assert_eq!(
            tokens,
            seq(&[
                "param:price:Currency", "=", "new", "Currency", "(", "NUMBER_0", ",", "unit:usd", ")",
            ])
        );
    }

    #[test]
    fn no_rewrites_applied_at_or_above_all_thresholds() {
        let mut tokens = seq(&[
            "attribute:name", "=", "\"", "x", "\"",
            "unit:defaultTemperature", "NUMBER_0", "unit:$usd",
        ]);
        let target = Version::parse("2.0.0").unwrap();
        let original = tokens.clone();
        apply(&mut tokens, &target);
        assert_eq!(tokens, original);
    }
}
