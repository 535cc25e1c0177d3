//! # ESC/POS Encoding
//!
//! Maps print directives to the command bytes thermal printers understand.
//!
//! ## Command Table
//! ```text
//! ┌──────────────────────┬──────────────────────┬───────────────────────────┐
//! │ Directive            │ Bytes                │ Meaning                   │
//! ├──────────────────────┼──────────────────────┼───────────────────────────┤
//! │ (job start)          │ 1B 40                │ ESC @   initialize        │
//! │ Align(a)             │ 1B 61 n              │ ESC a   0 left 1 ctr 2 rt │
//! │ Bold(b)              │ 1B 45 n              │ ESC E   emphasis on/off   │
//! │ TextSize{w,h}        │ 1D 21 (w-1)<<4|(h-1) │ GS !    magnification     │
//! │ Line(s) / TableRow   │ text 0A              │ Latin-1 text + LF         │
//! │ Rule                 │ '-' x width 0A       │                           │
//! │ Feed(n)              │ 1B 64 n              │ ESC d   feed n lines      │
//! │ Cut                  │ 1D 56 41 00          │ GS V A  feed + full cut   │
//! │ PulseDrawer          │ 1B 70 00 19 FA       │ ESC p   pin 2, 50/500ms   │
//! └──────────────────────┴──────────────────────┴───────────────────────────┘
//! ```

use tally_core::receipt::{render_row, Alignment, PrintDirective};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// Encodes directive lists into ESC/POS byte streams.
#[derive(Debug, Clone, Copy)]
pub struct EscPosEncoder {
    paper_width: usize,
}

impl EscPosEncoder {
    pub fn new(paper_width: usize) -> Self {
        EscPosEncoder { paper_width }
    }

    /// Encodes one job. The printer is re-initialized first so styles left
    /// over from a previous job never leak.
    pub fn encode(&self, directives: &[PrintDirective]) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 * directives.len().max(1));
        out.extend_from_slice(&[ESC, b'@']);

        for directive in directives {
            self.encode_one(directive, &mut out);
        }

        out
    }

    fn encode_one(&self, directive: &PrintDirective, out: &mut Vec<u8>) {
        match directive {
            PrintDirective::Align(align) => {
                let n = match align {
                    Alignment::Left => 0,
                    Alignment::Center => 1,
                    Alignment::Right => 2,
                };
                out.extend_from_slice(&[ESC, b'a', n]);
            }
            PrintDirective::Bold(on) => out.extend_from_slice(&[ESC, b'E', u8::from(*on)]),
            PrintDirective::TextSize { width, height } => {
                let w = (*width).clamp(1, 8) - 1;
                let h = (*height).clamp(1, 8) - 1;
                out.extend_from_slice(&[GS, b'!', (w << 4) | h]);
            }
            PrintDirective::Line(text) => {
                push_text(text, out);
                out.push(LF);
            }
            PrintDirective::Rule => {
                out.extend(std::iter::repeat(b'-').take(self.paper_width));
                out.push(LF);
            }
            PrintDirective::TableRow(cells) => {
                push_text(&render_row(cells), out);
                out.push(LF);
            }
            PrintDirective::Feed(lines) => out.extend_from_slice(&[ESC, b'd', *lines]),
            PrintDirective::Cut => out.extend_from_slice(&[GS, b'V', 0x41, 0x00]),
            PrintDirective::PulseDrawer => out.extend_from_slice(&[ESC, b'p', 0x00, 0x19, 0xFA]),
        }
    }
}

/// Writes text in the printer's Latin-1 code page. Characters outside it,
/// and control characters that would be read as commands, become `?`.
fn push_text(text: &str, out: &mut Vec<u8>) {
    out.extend(text.chars().map(|c| match u32::from(c) {
        0x20..=0x7E | 0xA0..=0xFF => u32::from(c) as u8,
        _ => b'?',
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::receipt::TableCell;

    fn encode(directives: &[PrintDirective]) -> Vec<u8> {
        EscPosEncoder::new(8).encode(directives)
    }

    #[test]
    fn test_job_starts_with_initialize() {
        assert_eq!(encode(&[]), vec![ESC, b'@']);
    }

    #[test]
    fn test_style_commands() {
        let bytes = encode(&[
            PrintDirective::Align(Alignment::Center),
            PrintDirective::Bold(true),
            PrintDirective::TextSize {
                width: 2,
                height: 2,
            },
        ]);

        assert_eq!(
            &bytes[2..],
            &[ESC, b'a', 1, ESC, b'E', 1, GS, b'!', 0x11]
        );
    }

    #[test]
    fn test_text_and_rule() {
        let bytes = encode(&[PrintDirective::Line("Hi".to_string()), PrintDirective::Rule]);
        assert_eq!(&bytes[2..], b"Hi\n--------\n");
    }

    #[test]
    fn test_latin1_text() {
        let bytes = encode(&[PrintDirective::Line("Año €".to_string())]);
        assert_eq!(&bytes[2..], &[b'A', 0xF1, b'o', b' ', b'?', LF]);
    }

    #[test]
    fn test_control_characters_are_neutralized() {
        let bytes = encode(&[PrintDirective::Line("a\x1Bb".to_string())]);
        assert_eq!(&bytes[2..], b"a?b\n");
    }

    #[test]
    fn test_table_row() {
        let bytes = encode(&[PrintDirective::TableRow(vec![
            TableCell::new("3", Alignment::Left, 3),
            TableCell::new("$7.50", Alignment::Right, 6),
        ])]);
        assert_eq!(&bytes[2..], b"3   $7.50\n");
    }

    #[test]
    fn test_feed_cut_and_drawer() {
        let bytes = encode(&[
            PrintDirective::Feed(3),
            PrintDirective::Cut,
            PrintDirective::PulseDrawer,
        ]);
        assert_eq!(
            &bytes[2..],
            &[ESC, b'd', 3, GS, b'V', 0x41, 0x00, ESC, b'p', 0x00, 0x19, 0xFA]
        );
    }

    #[test]
    fn test_text_size_is_clamped() {
        let bytes = encode(&[PrintDirective::TextSize {
            width: 0,
            height: 12,
        }]);
        assert_eq!(&bytes[2..], &[GS, b'!', 0x07]);
    }
}
