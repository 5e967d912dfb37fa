//! Writer/Reader round-trip matrix, bounds errors and window checks.

use richtext_cd_buffers::{print_octets, BufferError, ByteWindow, Reader, Writer};

// ---------------------------------------------------------------------------
// Writer/Reader round trips
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_unsigned() {
    let mut data = [0u8; 1 + 2 + 4 + 8];
    let mut w = Writer::new(&mut data);
    w.u8(u8::MAX).unwrap();
    w.u16(0x0102).unwrap();
    w.u32(u32::MAX).unwrap();
    w.u64(0x0102_0304_0506_0708).unwrap();
    assert_eq!(w.size(), 0);

    let mut r = Reader::new(&data);
    assert_eq!(r.u8().unwrap(), u8::MAX);
    assert_eq!(r.u16().unwrap(), 0x0102);
    assert_eq!(r.u32().unwrap(), u32::MAX);
    assert_eq!(r.u64().unwrap(), 0x0102_0304_0506_0708);
    assert_eq!(r.size(), 0);
}

#[test]
fn roundtrip_signed() {
    let mut data = [0u8; 1 + 2 + 4 + 8];
    let mut w = Writer::new(&mut data);
    w.i8(i8::MIN).unwrap();
    w.i16(-1000).unwrap();
    w.i32(i32::MIN).unwrap();
    w.i64(-1).unwrap();

    let mut r = Reader::new(&data);
    assert_eq!(r.i8().unwrap(), i8::MIN);
    assert_eq!(r.i16().unwrap(), -1000);
    assert_eq!(r.i32().unwrap(), i32::MIN);
    assert_eq!(r.i64().unwrap(), -1);
}

#[test]
fn little_endian_layout() {
    let mut data = [0u8; 6];
    let mut w = Writer::new(&mut data);
    w.u16(0xFF70).unwrap();
    w.u32(0x0000_000B).unwrap();
    assert_eq!(data, [0x70, 0xFF, 0x0B, 0x00, 0x00, 0x00]);
}

#[test]
fn uint_by_width() {
    for width in [1usize, 2, 4, 8] {
        let mut data = [0u8; 8];
        let value = if width == 8 { u64::MAX } else { (1u64 << (8 * width)) - 1 };
        Writer::new(&mut data).uint(width, value).unwrap();
        assert_eq!(Reader::new(&data).uint(width).unwrap(), value, "width={width}");
        assert!(data[width..].iter().all(|b| *b == 0));
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

#[test]
fn read_past_end() {
    let data = [1u8, 2, 3];
    let mut r = Reader::new(&data);
    r.skip(2).unwrap();
    assert_eq!(
        r.u16(),
        Err(BufferError::EndOfBuffer {
            offset: 2,
            wanted: 2,
            available: 1
        })
    );
    assert_eq!(r.u8().unwrap(), 3);
}

#[test]
fn write_past_end_leaves_slice_untouched() {
    let mut data = [0u8; 3];
    let mut w = Writer::at(&mut data, 1);
    assert_eq!(
        w.u32(0xFFFF_FFFF),
        Err(BufferError::Overflow {
            offset: 1,
            wanted: 4,
            available: 2
        })
    );
    assert_eq!(data, [0, 0, 0]);
}

#[test]
fn cut_clamps_nested_reader() {
    let data = [1u8, 2, 3, 4, 5];
    let mut r = Reader::new(&data);
    r.u8().unwrap();
    let mut inner = r.cut(2).unwrap();
    assert_eq!(inner.u16().unwrap(), 0x0302);
    assert!(inner.u8().is_err());
    assert_eq!(r.u8().unwrap(), 4);
    assert!(r.cut(5).is_err());
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

#[test]
fn window_generation_matrix() {
    let mut data = vec![0u8; 8];
    let window = ByteWindow::new(2, 4, 7);
    window.as_mut_slice(&mut data, 7).unwrap().copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(data, [0, 0, 1, 2, 3, 4, 0, 0]);

    let sub = window.sub(1, 2).unwrap();
    assert_eq!(sub.as_slice(&data, 7).unwrap(), &[2, 3]);
    assert!(window.sub(3, 2).is_err());

    assert_eq!(
        sub.as_slice(&data, 8),
        Err(BufferError::StaleWindow { window: 7, buffer: 8 })
    );
    data.truncate(4);
    assert!(matches!(
        window.as_slice(&data, 7),
        Err(BufferError::EndOfBuffer { .. })
    ));
}

#[test]
fn print_octets_limits() {
    assert_eq!(print_octets(&[0x70, 0xFF, 0x0B, 0x00], 2), "70 ff ... (2 more)");
}

#[test]
fn errors_display() {
    let err = BufferError::StaleWindow { window: 1, buffer: 2 };
    assert!(err.to_string().contains("1"));
}
