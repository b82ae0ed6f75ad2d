//! Packed 32-bit color values
//!
//! A [`Color`] stores one RGBA color in a single `u32` laid out as
//! `0xAARRGGBB`. Each channel can be read as a byte and written either as an
//! integer (masked to one byte) or as a fraction in `0.0..=1.0`.
//!
//! Only the `#RRGGBB` hex form is accepted. Colors built from hex strings
//! have alpha 0; palette matching ignores alpha entirely.

use image::Rgba;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Error type for color construction and channel updates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// String is not of the form `#RRGGBB`
    #[error("invalid hex color '{0}', expected the form #RRGGBB")]
    InvalidFormat(String),
    /// Channel array is not 3 (RGB) or 4 (RGBA) bytes long
    #[error("invalid channel array length {0}, expected 3 or 4")]
    InvalidLength(usize),
    /// A dynamically typed channel value was neither an integer nor a float
    #[error("expected int or float, got instead '{received}'")]
    TypeMismatch { received: &'static str },
}

/// One of the four channels of a packed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Alpha,
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Bit offset of the channel inside the packed value
    const fn shift(self) -> u32 {
        match self {
            Channel::Alpha => 24,
            Channel::Red => 16,
            Channel::Green => 8,
            Channel::Blue => 0,
        }
    }

    const fn mask(self) -> u32 {
        0xff << self.shift()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Alpha => write!(f, "alpha"),
            Channel::Red => write!(f, "red"),
            Channel::Green => write!(f, "green"),
            Channel::Blue => write!(f, "blue"),
        }
    }
}

/// A value written into a single channel.
///
/// `Byte` values wrap through a one-byte mask (300 becomes 44, -1 becomes 255).
/// `Fraction` values are scaled by 255 and truncated toward zero, then take
/// the `Byte` path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelValue {
    Byte(i64),
    Fraction(f64),
}

impl ChannelValue {
    /// Resolve to the byte that will be stored.
    pub fn to_byte(self) -> u8 {
        match self {
            ChannelValue::Byte(v) => (v & 0xff) as u8,
            ChannelValue::Fraction(f) => ChannelValue::Byte((f * 255.0).trunc() as i64).to_byte(),
        }
    }

    /// Interpret a JSON value as a channel value.
    ///
    /// Integers map to [`ChannelValue::Byte`], other numbers to
    /// [`ChannelValue::Fraction`]. Anything else (including booleans) is a
    /// [`ColorError::TypeMismatch`].
    pub fn from_json(value: &Value) -> Result<Self, ColorError> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ChannelValue::Byte(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(ChannelValue::Byte((u & 0xff) as i64))
                } else {
                    Ok(ChannelValue::Fraction(n.as_f64().unwrap_or(0.0)))
                }
            }
            other => Err(ColorError::TypeMismatch { received: json_type_name(other) }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

impl From<u8> for ChannelValue {
    fn from(v: u8) -> Self {
        ChannelValue::Byte(v as i64)
    }
}

impl From<i32> for ChannelValue {
    fn from(v: i32) -> Self {
        ChannelValue::Byte(v as i64)
    }
}

impl From<i64> for ChannelValue {
    fn from(v: i64) -> Self {
        ChannelValue::Byte(v)
    }
}

impl From<f32> for ChannelValue {
    fn from(v: f32) -> Self {
        ChannelValue::Fraction(v as f64)
    }
}

impl From<f64> for ChannelValue {
    fn from(v: f64) -> Self {
        ChannelValue::Fraction(v)
    }
}

/// An RGBA color packed as `0xAARRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(u32);

impl Color {
    /// Build a color from a packed value. Bits above the low 32 are dropped.
    pub const fn new(value: u64) -> Self {
        Color((value & 0xffff_ffff) as u32)
    }

    /// Build an RGB color with alpha 0.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// The packed `0xAARRGGBB` value
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Parse a `#RRGGBB` hex color (either case). Alpha is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use palswap::color::Color;
    ///
    /// let grey = Color::from_hex("#333333").unwrap();
    /// assert_eq!(grey.to_rgb_array(), [0x33, 0x33, 0x33]);
    /// assert_eq!(grey.alpha(), 0);
    /// assert!(Color::from_hex("333333").is_err());
    /// ```
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidFormat(s.to_string());

        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 {
            return Err(invalid());
        }

        let mut rgb: u32 = 0;
        for c in digits.chars() {
            let d = c.to_digit(16).ok_or_else(invalid)?;
            rgb = (rgb << 4) | d;
        }
        Ok(Color(rgb))
    }

    /// Build a color from 3 (RGB, alpha 0) or 4 (RGBA) channel bytes.
    pub fn from_channels(bytes: &[u8]) -> Result<Self, ColorError> {
        if bytes.len() != 3 && bytes.len() != 4 {
            return Err(ColorError::InvalidLength(bytes.len()));
        }
        let mut color = Color(0);
        color.set_red(bytes[0] as i64);
        color.set_green(bytes[1] as i64);
        color.set_blue(bytes[2] as i64);
        if let Some(&a) = bytes.get(3) {
            color.set_alpha(a as i64);
        }
        Ok(color)
    }

    /// Read a single channel.
    pub const fn channel(self, channel: Channel) -> u8 {
        ((self.0 & channel.mask()) >> channel.shift()) as u8
    }

    pub const fn alpha(self) -> u8 {
        self.channel(Channel::Alpha)
    }

    pub const fn red(self) -> u8 {
        self.channel(Channel::Red)
    }

    pub const fn green(self) -> u8 {
        self.channel(Channel::Green)
    }

    pub const fn blue(self) -> u8 {
        self.channel(Channel::Blue)
    }

    /// Write a single channel, leaving the other three untouched.
    pub fn set_channel(&mut self, channel: Channel, value: impl Into<ChannelValue>) {
        let byte = value.into().to_byte() as u32;
        self.0 = (self.0 & !channel.mask()) | (byte << channel.shift());
    }

    /// Write a channel from a dynamically typed JSON value.
    pub fn set_channel_json(&mut self, channel: Channel, value: &Value) -> Result<(), ColorError> {
        let value = ChannelValue::from_json(value)?;
        self.set_channel(channel, value);
        Ok(())
    }

    pub fn set_alpha(&mut self, value: i64) {
        self.set_channel(Channel::Alpha, ChannelValue::Byte(value));
    }

    pub fn set_red(&mut self, value: i64) {
        self.set_channel(Channel::Red, ChannelValue::Byte(value));
    }

    pub fn set_green(&mut self, value: i64) {
        self.set_channel(Channel::Green, ChannelValue::Byte(value));
    }

    pub fn set_blue(&mut self, value: i64) {
        self.set_channel(Channel::Blue, ChannelValue::Byte(value));
    }

    pub fn set_alpha_fraction(&mut self, value: f64) {
        self.set_channel(Channel::Alpha, ChannelValue::Fraction(value));
    }

    pub fn set_red_fraction(&mut self, value: f64) {
        self.set_channel(Channel::Red, ChannelValue::Fraction(value));
    }

    pub fn set_green_fraction(&mut self, value: f64) {
        self.set_channel(Channel::Green, ChannelValue::Fraction(value));
    }

    pub fn set_blue_fraction(&mut self, value: f64) {
        self.set_channel(Channel::Blue, ChannelValue::Fraction(value));
    }

    /// Lowercase `#rrggbb`, alpha not included.
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }

    /// `(red, green, blue, alpha)`
    pub const fn to_rgba_tuple(self) -> (u8, u8, u8, u8) {
        (self.red(), self.green(), self.blue(), self.alpha())
    }

    /// `[red, green, blue, alpha]`
    pub const fn to_array(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    /// `[red, green, blue]`
    pub const fn to_rgb_array(self) -> [u8; 3] {
        [self.red(), self.green(), self.blue()]
    }

    /// Equality on red, green and blue only. This is the identity used when
    /// classifying pixels, since source images may or may not carry alpha.
    pub const fn rgb_eq(self, other: Color) -> bool {
        (self.0 & 0x00ff_ffff) == (other.0 & 0x00ff_ffff)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, a) = self.to_rgba_tuple();
        write!(f, "<RGBA({}, {}, {}, {}) {}>", r, g, b, a, self.to_hex())
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Color(value)
    }
}

impl From<Rgba<u8>> for Color {
    fn from(rgba: Rgba<u8>) -> Self {
        let [r, g, b, a] = rgba.0;
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        Rgba(color.to_array())
    }
}
