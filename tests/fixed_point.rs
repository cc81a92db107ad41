use converter_lab::{
    pacing::Pacer,
    settings::{self, FixedPointSettings},
    sink::JsonLines,
};

#[test]
fn default_session() {
    let mut settings = FixedPointSettings::default();
    settings::apply(&mut settings, ["/clear_bits=[5]"]).unwrap();
    let mut session = settings.build().unwrap();
    let mut sink = JsonLines::new(Vec::new());
    let mut pacer = Pacer::headless();
    session.announce(&mut sink);
    for &i in settings.set_bits.iter() {
        session.set_bit(i, &mut sink, &mut pacer).unwrap();
    }
    for &i in settings.clear_bits.iter() {
        session.clear_bit(i, &mut sink, &mut pacer).unwrap();
    }
    assert_eq!(session.word().raw(), 0b1_0011);

    let out = String::from_utf8(sink.finish().unwrap()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2 + 5 * 2);
    assert_eq!(lines[0], r#"{"SetNumberOfBits":8}"#);
    assert_eq!(lines[10], r#"{"ClearBit":5}"#);
    assert!(lines[11].starts_with(r#"{"UpdateLabels":{"integer":19,"#));
}
