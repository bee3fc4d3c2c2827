//! Text encoding of effect parameters.
//!
//! Parameters persist as `Key:Value` fields joined with `|`, for example
//! `Darkness:0.60|ShadowSize:7|ShadowOffset:-1,-1`. Numbers always use `.`
//! as the decimal point and never depend on the host locale.
//!
//! Decoding is tolerant. It starts from the effect's defaults, ignores
//! unknown keys and skips any field whose value does not parse, so a damaged
//! or older configuration still yields a usable effect.

use crate::effects::{
    AdjustEffect, BlurEffect, BorderEffect, DropShadowEffect, EffectKind, ImageEffect,
    MonochromeEffect, ReduceColorsEffect, ResizeCanvasEffect, ResizeEffect, RotateEffect,
    TornEdgeEffect,
};
use crate::raster::Rgba8;

const FIELD_SEPARATOR: char = '|';
const KEY_SEPARATOR: char = ':';
const LIST_SEPARATOR: char = ',';

/// Marker key that identifies a torn-edge string in the shadow family.
const TORN_EDGE_MARKER: &str = "ToothHeight";

/// Converts effects to and from their persisted text form.
pub struct EffectConverter;

impl EffectConverter {
    /// Encode an effect's parameters.
    pub fn encode(effect: &ImageEffect) -> String {
        let mut fields = Vec::new();
        match effect {
            ImageEffect::Adjust(e) => e.encode_fields(&mut fields),
            ImageEffect::Blur(e) => e.encode_fields(&mut fields),
            ImageEffect::Border(e) => e.encode_fields(&mut fields),
            ImageEffect::DropShadow(e) => e.encode_fields(&mut fields),
            ImageEffect::Grayscale(_) | ImageEffect::Invert(_) => {}
            ImageEffect::Monochrome(e) => e.encode_fields(&mut fields),
            ImageEffect::ReduceColors(e) => e.encode_fields(&mut fields),
            ImageEffect::ResizeCanvas(e) => e.encode_fields(&mut fields),
            ImageEffect::Resize(e) => e.encode_fields(&mut fields),
            ImageEffect::Rotate(e) => e.encode_fields(&mut fields),
            ImageEffect::TornEdge(e) => e.encode_fields(&mut fields),
        }
        fields.join(&FIELD_SEPARATOR.to_string())
    }

    /// Decode parameters for a known effect kind. Never fails.
    pub fn decode(kind: EffectKind, text: &str) -> ImageEffect {
        let mut effect = ImageEffect::default_for(kind);
        match &mut effect {
            ImageEffect::Adjust(e) => decode_into(e, text),
            ImageEffect::Blur(e) => decode_into(e, text),
            ImageEffect::Border(e) => decode_into(e, text),
            ImageEffect::DropShadow(e) => decode_into(e, text),
            ImageEffect::Grayscale(_) | ImageEffect::Invert(_) => {}
            ImageEffect::Monochrome(e) => decode_into(e, text),
            ImageEffect::ReduceColors(e) => decode_into(e, text),
            ImageEffect::ResizeCanvas(e) => decode_into(e, text),
            ImageEffect::Resize(e) => decode_into(e, text),
            ImageEffect::Rotate(e) => decode_into(e, text),
            ImageEffect::TornEdge(e) => decode_into(e, text),
        }
        effect
    }

    /// Decode an untagged drop-shadow or torn-edge string.
    ///
    /// Strings containing `ToothHeight` are torn edges, anything else is a
    /// drop shadow.
    pub fn decode_shadow_family(text: &str) -> ImageEffect {
        if text.contains(TORN_EDGE_MARKER) {
            Self::decode(EffectKind::TornEdge, text)
        } else {
            Self::decode(EffectKind::DropShadow, text)
        }
    }
}

/// What happened to a single decoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Applied,
    Unknown,
    Malformed,
}

/// Parameters that can be written as and read from `Key:Value` fields.
trait FieldCodec {
    fn encode_fields(&self, out: &mut Vec<String>);
    fn decode_field(&mut self, key: &str, value: &str) -> Field;
}

fn decode_into<T: FieldCodec>(target: &mut T, text: &str) {
    for raw in text.split(FIELD_SEPARATOR) {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let Some((key, value)) = raw.split_once(KEY_SEPARATOR) else {
            tracing::debug!(field = raw, "skipping field without a key");
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        match target.decode_field(key, value) {
            Field::Applied => {}
            Field::Unknown => tracing::debug!(key, "ignoring unknown field"),
            Field::Malformed => tracing::debug!(key, value, "skipping malformed field"),
        }
    }
}

fn assign<T>(slot: &mut T, parsed: Option<T>) -> Field {
    match parsed {
        Some(value) => {
            *slot = value;
            Field::Applied
        }
        None => Field::Malformed,
    }
}

fn push(out: &mut Vec<String>, key: &str, value: impl std::fmt::Display) {
    out.push(format!("{key}{KEY_SEPARATOR}{value}"));
}

fn format_decimal(value: f32) -> String {
    format!("{value:.2}")
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn format_list<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(&LIST_SEPARATOR.to_string())
}

fn parse<T: std::str::FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}

fn parse_decimal(value: &str) -> Option<f32> {
    value.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse exactly `N` comma-separated items.
fn parse_list<T, const N: usize>(value: &str, item: impl Fn(&str) -> Option<T>) -> Option<[T; N]>
where
    T: Copy + Default,
{
    let mut out = [T::default(); N];
    let mut parts = value.split(LIST_SEPARATOR);
    for slot in out.iter_mut() {
        *slot = item(parts.next()?.trim())?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

fn parse_color(value: &str) -> Option<Rgba8> {
    parse_list(value, parse::<u8>)
}

impl FieldCodec for AdjustEffect {
    fn encode_fields(&self, out: &mut Vec<String>) {
        push(out, "Contrast", format_decimal(self.contrast));
        push(out, "Brightness", format_decimal(self.brightness));
        push(out, "Gamma", format_decimal(self.gamma));
    }

    fn decode_field(&mut self, key: &str, value: &str) -> Field {
        match key {
            "Contrast" => assign(&mut self.contrast, parse_decimal(value)),
            "Brightness" => assign(&mut self.brightness, parse_decimal(value)),
            "Gamma" => assign(&mut self.gamma, parse_decimal(value)),
            _ => Field::Unknown,
        }
    }
}

impl FieldCodec for BlurEffect {
    fn encode_fields(&self, out: &mut Vec<String>) {
        push(out, "Range", self.range);
    }

    fn decode_field(&mut self, key: &str, value: &str) -> Field {
        match key {
            "Range" => assign(&mut self.range, parse(value)),
            _ => Field::Unknown,
        }
    }
}

impl FieldCodec for BorderEffect {
    fn encode_fields(&self, out: &mut Vec<String>) {
        push(out, "Width", self.width);
        push(out, "Color", format_list(&self.color));
    }

    fn decode_field(&mut self, key: &str, value: &str) -> Field {
        match key {
            "Width" => assign(&mut self.width, parse(value)),
            "Color" => assign(&mut self.color, parse_color(value)),
            _ => Field::Unknown,
        }
    }
}

impl FieldCodec for DropShadowEffect {
    fn encode_fields(&self, out: &mut Vec<String>) {
        push(out, "Darkness", format_decimal(self.darkness));
        push(out, "ShadowSize", self.shadow_size);
        push(out, "ShadowOffset", format_list(&[self.offset.0, self.offset.1]));
    }

    fn decode_field(&mut self, key: &str, value: &str) -> Field {
        match key {
            "Darkness" => assign(
                &mut self.darkness,
                parse_decimal(value).filter(|d| (0.0..=1.0).contains(d)),
            ),
            "ShadowSize" => assign(&mut self.shadow_size, parse(value)),
            "ShadowOffset" => assign(
                &mut self.offset,
                parse_list(value, parse::<i32>).map(|[x, y]| (x, y)),
            ),
            _ => Field::Unknown,
        }
    }
}

impl FieldCodec for MonochromeEffect {
    fn encode_fields(&self, out: &mut Vec<String>) {
        push(out, "Threshold", self.threshold);
    }

    fn decode_field(&mut self, key: &str, value: &str) -> Field {
        match key {
            "Threshold" => assign(&mut self.threshold, parse(value)),
            _ => Field::Unknown,
        }
    }
}

impl FieldCodec for ReduceColorsEffect {
    fn encode_fields(&self, out: &mut Vec<String>) {
        push(out, "Colors", self.colors);
    }

    fn decode_field(&mut self, key: &str, value: &str) -> Field {
        match key {
            "Colors" => assign(&mut self.colors, parse(value)),
            _ => Field::Unknown,
        }
    }
}

impl FieldCodec for ResizeCanvasEffect {
    fn encode_fields(&self, out: &mut Vec<String>) {
        push(out, "Left", self.left);
        push(out, "Right", self.right);
        push(out, "Top", self.top);
        push(out, "Bottom", self.bottom);
        if let Some(color) = self.background {
            push(out, "BackgroundColor", format_list(&color));
        }
    }

    fn decode_field(&mut self, key: &str, value: &str) -> Field {
        match key {
            "Left" => assign(&mut self.left, parse(value)),
            "Right" => assign(&mut self.right, parse(value)),
            "Top" => assign(&mut self.top, parse(value)),
            "Bottom" => assign(&mut self.bottom, parse(value)),
            "BackgroundColor" => assign(&mut self.background, parse_color(value).map(Some)),
            _ => Field::Unknown,
        }
    }
}

impl FieldCodec for ResizeEffect {
    fn encode_fields(&self, out: &mut Vec<String>) {
        push(out, "Width", self.width);
        push(out, "Height", self.height);
        push(
            out,
            "MaintainAspectRatio",
            format_bool(self.maintain_aspect_ratio),
        );
    }

    fn decode_field(&mut self, key: &str, value: &str) -> Field {
        match key {
            "Width" => assign(&mut self.width, parse(value)),
            "Height" => assign(&mut self.height, parse(value)),
            "MaintainAspectRatio" => assign(&mut self.maintain_aspect_ratio, parse_bool(value)),
            _ => Field::Unknown,
        }
    }
}

impl FieldCodec for RotateEffect {
    fn encode_fields(&self, out: &mut Vec<String>) {
        push(out, "Angle", self.angle);
    }

    fn decode_field(&mut self, key: &str, value: &str) -> Field {
        match key {
            "Angle" => assign(&mut self.angle, parse(value)),
            _ => Field::Unknown,
        }
    }
}

impl FieldCodec for TornEdgeEffect {
    fn encode_fields(&self, out: &mut Vec<String>) {
        self.shadow.encode_fields(out);
        push(out, "GenerateShadow", format_bool(self.generate_shadow));
        push(out, "ToothHeight", self.tooth_height);
        push(out, "HorizontalToothRange", self.horizontal_tooth_range);
        push(out, "VerticalToothRange", self.vertical_tooth_range);
        let edges = self.edges.map(format_bool);
        push(out, "Edges", format_list(&edges));
    }

    fn decode_field(&mut self, key: &str, value: &str) -> Field {
        match key {
            "GenerateShadow" => assign(&mut self.generate_shadow, parse_bool(value)),
            "ToothHeight" => assign(&mut self.tooth_height, parse(value)),
            "HorizontalToothRange" => assign(&mut self.horizontal_tooth_range, parse(value)),
            "VerticalToothRange" => assign(&mut self.vertical_tooth_range, parse(value)),
            "Edges" => assign(&mut self.edges, parse_list(value, parse_bool)),
            _ => self.shadow.decode_field(key, value),
        }
    }
}
