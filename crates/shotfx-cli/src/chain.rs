//! Parsing `KIND[=ENCODED]` effect arguments.

use std::str::FromStr;

use shotfx_core::{EffectConverter, EffectKind, ImageEffect};

/// One `-e` argument: an effect kind with optional encoded parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectArg(pub ImageEffect);

impl FromStr for EffectArg {
    type Err = String;

    /// `drop-shadow` uses defaults, `blur=Range:5` overrides fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, encoded) = s.split_once('=').unwrap_or((s, ""));
        let kind: EffectKind = name.parse().map_err(|err| {
            let known: Vec<&str> = EffectKind::ALL.iter().map(|k| k.name()).collect();
            format!("{err} (expected one of: {})", known.join(", "))
        })?;
        Ok(EffectArg(EffectConverter::decode(kind, encoded)))
    }
}

/// Render the chain back to its `KIND=ENCODED` form.
pub fn describe(effects: &[ImageEffect]) -> Vec<String> {
    effects
        .iter()
        .map(|effect| {
            let encoded = EffectConverter::encode(effect);
            if encoded.is_empty() {
                effect.kind().to_string()
            } else {
                format!("{}={}", effect.kind(), encoded)
            }
        })
        .collect()
}
