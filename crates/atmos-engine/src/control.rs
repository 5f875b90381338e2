//! High-level control mappings onto the parameter plane.
//!
//! Expressions are short `key:value` lists where every value is normalized
//! to [0, 1] and mapped onto one or more controls. Biosignals map physiological
//! readings onto intensity, room size, modulation and brightness.

use crate::ParameterPlane;

/// Physiological reading kinds accepted by [`ParameterPlane::update_biosignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biosignal {
    /// Heart rate in beats per minute, mapped over 40-200.
    HeartRate,
    /// Heart-rate variability in milliseconds, mapped over 10-100.
    HeartRateVariability,
}

impl ParameterPlane {
    /// Apply a control expression such as `"distance:0.2, warmth=0.5"`.
    ///
    /// Entries are separated by spaces or commas; keys and values by `:` or
    /// `=`, with optional whitespace around the separator. Unknown keys are skipped. Parsing stops at the first value that
    /// does not start with a number. Returns the number of recognised keys
    /// applied.
    ///
    /// | key | effect |
    /// |-----|--------|
    /// | `distance` | distance = 0.1 + v·1000 |
    /// | `room_size` | room size = v |
    /// | `brightness` | brightness = 2v − 1 |
    /// | `width` | width = 2v |
    /// | `dry_wet` | dry/wet = v |
    /// | `intensity` | intensity = v |
    /// | `warmth` | brightness = −v |
    /// | `tension` | brightness = v, modulation = v |
    /// | `intimacy` | distance = 0.1 + 5v, dry/wet = 0.3, width = 0.6 |
    /// | `chaos` | lofi = v, modulation = v |
    /// | `underwater` | applies the `deep_sea` scenario |
    ///
    /// ```rust
    /// use atmos_engine::ParameterPlane;
    ///
    /// let plane = ParameterPlane::new();
    /// assert_eq!(plane.apply_expression("room_size:0.8, width=0.25"), 2);
    /// assert_eq!(plane.main_params().room_size, 0.8);
    /// assert_eq!(plane.main_params().width, 0.5);
    /// ```
    pub fn apply_expression(&self, expression: &str) -> usize {
        let mut rest = expression;
        let mut applied = 0;

        loop {
            rest = rest.trim_start_matches([' ', ',']);
            if rest.is_empty() {
                break;
            }
            let key_end = rest.find([':', '=']).unwrap_or(rest.len());
            let key = rest[..key_end].trim_end();
            rest = &rest[key_end..];
            if let Some(stripped) = rest.strip_prefix([':', '=']) {
                rest = stripped;
            }
            rest = rest.trim_start();
            let Some((value, len)) = parse_number_prefix(rest) else {
                break;
            };
            rest = &rest[len..];

            if self.apply_expression_key(key, value) {
                applied += 1;
            } else {
                tracing::debug!(key, "unknown expression key skipped");
            }
        }
        applied
    }

    fn apply_expression_key(&self, key: &str, value: f32) -> bool {
        match key {
            "distance" => self.set_distance(0.1 + value * 1000.0),
            "room_size" => self.set_room_size(value),
            "brightness" => self.set_brightness(value * 2.0 - 1.0),
            "width" => self.set_width(value * 2.0),
            "dry_wet" => self.set_dry_wet(value),
            "intensity" => self.set_intensity(value),
            "warmth" => self.set_brightness(-value),
            "tension" => {
                self.set_brightness(value);
                self.set_modulation(value);
            }
            "intimacy" => {
                self.set_distance(0.1 + value * 5.0);
                self.set_dry_wet(0.3);
                self.set_width(0.6);
            }
            "chaos" => {
                self.set_lofi_amount(value);
                self.set_modulation(value);
            }
            "underwater" => {
                if let Err(e) = self.apply_scenario("deep_sea", 1.0) {
                    tracing::warn!(error = %e, "underwater expression failed");
                }
            }
            _ => return false,
        }
        true
    }

    /// Map a physiological reading onto the plane.
    ///
    /// Heart rate drives intensity (0.5-1.0) and room size (0.3-0.9). HRV
    /// drives modulation (0.8 down to 0.2) and brightness (−0.2-0.2). A NaN
    /// reading leaves every control unchanged.
    pub fn update_biosignal(&self, kind: Biosignal, value: f32) {
        match kind {
            Biosignal::HeartRate => {
                let norm = ((value - 40.0) / 160.0).clamp(0.0, 1.0);
                self.set_intensity(0.5 + 0.5 * norm);
                self.set_room_size(0.3 + 0.6 * norm);
            }
            Biosignal::HeartRateVariability => {
                let norm = ((value - 10.0) / 90.0).clamp(0.0, 1.0);
                self.set_modulation(0.2 + 0.6 * (1.0 - norm));
                self.set_brightness(-0.2 + 0.4 * norm);
            }
        }
    }
}

/// Parse the longest decimal number at the start of `s`.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent. Returns the value and the number of bytes consumed.
fn parse_number_prefix(s: &str) -> Option<(f32, usize)> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    s[..end].parse::<f32>().ok().map(|v| (v, end))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
