use anyhow::{Context, Result, bail};

/// Seed used when the command line names none.
pub const DEFAULT_SEED: u64 = 1337;

const MAX_RANGE_SEEDS: u64 = 10_000;

/// Resolve CLI seed tokens into unique seeds, keeping first-seen order.
///
/// Accepts decimal integers (negative values use their magnitude),
/// `0x`-prefixed hex, and `a..b` inclusive ranges.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();
    let mut push = |seed: u64| {
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    };

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            let start = parse_seed(start)?;
            let end = parse_seed(end)?;
            if end < start {
                bail!("Seed range {token} is empty");
            }
            if end - start >= MAX_RANGE_SEEDS {
                bail!("Seed range {token} spans more than {MAX_RANGE_SEEDS} seeds");
            }
            (start..=end).for_each(&mut push);
            continue;
        }

        push(parse_seed(token)?);
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn parse_seed(token: &str) -> Result<u64> {
    let token = token.trim();
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .with_context(|| format!("Unrecognized seed token: {token}"));
    }
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    token
        .parse::<u64>()
        .with_context(|| format!("Unrecognized seed token: {token}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_numeric_hex_and_ranges() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "0x10", "3..5", "4"])).unwrap();
        assert_eq!(seeds, vec![42, 7, 16, 3, 4, 5]);
    }

    #[test]
    fn large_unsigned_seeds_parse() {
        let seeds = resolve_seed_inputs(&tokens(&["18446744073709551615"])).unwrap();
        assert_eq!(seeds, vec![u64::MAX]);
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_garbage_and_reversed_ranges() {
        assert!(resolve_seed_inputs(&tokens(&["banana"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["9..2"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0..20000"])).is_err());
    }
}
