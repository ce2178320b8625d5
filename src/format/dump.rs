// Human-readable rendering of frames

use crate::protocol::{Frame, OpCode, Register};

/// Offset / hex / ASCII listing, 16 bytes per row
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();

    for (offset, chunk) in data.chunks(16).enumerate() {
        out.push_str(&format!("{:08X}  ", offset * 16));

        for i in 0..16 {
            match chunk.get(i) {
                Some(byte) => out.push_str(&format!("{:02X} ", byte)),
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        for &byte in chunk {
            let c = if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '.'
            };
            out.push(c);
        }
        out.push('\n');
    }

    out
}

fn op_label(op_code: u8) -> String {
    match OpCode::try_from(op_code) {
        Ok(op) => op.to_string(),
        Err(raw) => format!("0x{:02X}", raw),
    }
}

fn register_label(address: u8) -> String {
    match Register::from_address(address) {
        Some(reg) => reg.name().to_string(),
        None => format!("REG_{:02X}", address),
    }
}

/// Describe a frame: header summary, hex listing, then one line per register
pub fn dump_frame(frame: &Frame) -> String {
    if frame.is_error_sentinel() {
        return format!("Device error (length 0xFF)\n{}", hex_dump(&frame.encode()));
    }

    let mut out = format!(
        "Op: {}  Start: 0x{:02X}  Length: {}\n",
        op_label(frame.op_code()),
        frame.start_register(),
        frame.length()
    );
    out.push_str(&hex_dump(&frame.encode()));

    for (address, value) in frame.registers() {
        out.push_str(&format!(
            "  {:<8} (0x{:02X}) = 0x{:02X}\n",
            register_label(address),
            address,
            value
        ));
    }

    out
}
