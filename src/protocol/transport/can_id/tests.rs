//! Unit tests for `CanId` construction and conversions.
use super::*;

#[test]
/// Extended identifiers keep their 29-bit value.
fn test_extended_keeps_value() {
    let id = CanId::extended(0x02A0240E);
    assert_eq!(id.raw(), 0x02A0240E);
    assert!(id.is_extended());
}

#[test]
/// Stray high bits must never leak into the identifier.
fn test_constructors_mask_extra_bits() {
    assert_eq!(CanId::extended(0xE217_FFFC).raw(), 0x0217_FFFC);
    assert_eq!(CanId::standard(0xF123).raw(), 0x123);
}

#[test]
/// Checked constructors reject values that do not fit.
fn test_checked_constructors() {
    assert!(CanId::try_extended(0x1FFF_FFFF).is_ok());
    assert!(matches!(
        CanId::try_extended(0x2000_0000),
        Err(CanIdBuildError::OutOfRange { raw: 0x2000_0000 })
    ));
    assert!(CanId::try_standard(0x7FF).is_ok());
    assert!(CanId::try_standard(0x800).is_err());
}

#[test]
/// Conversion to and from `embedded_can::Id` preserves kind and value.
fn test_embedded_can_conversion() {
    let id: Id = CanId::extended(0x1A0600A).into();
    match id {
        Id::Extended(ext) => assert_eq!(ext.as_raw(), 0x1A0600A),
        Id::Standard(_) => panic!("expected an extended identifier"),
    }

    let back: CanId = Id::Standard(StandardId::new(0x321).unwrap()).into();
    assert_eq!(back, CanId::Standard(0x321));
}
