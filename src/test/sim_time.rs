use crate::sim::SimTime;

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_nanos(7), SimTime(7));
    assert_eq!(SimTime::from_micros(1), SimTime(1_000));
    assert_eq!(SimTime::from_millis(1), SimTime(1_000_000));
    assert_eq!(SimTime::from_secs(1), SimTime(1_000_000_000));
}

#[test]
fn sim_time_unit_conversions_saturate_on_overflow() {
    assert_eq!(SimTime::from_micros(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_millis(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_secs(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime(u64::MAX).saturating_add(SimTime(1)), SimTime(u64::MAX));
    assert_eq!(SimTime(1).saturating_sub(SimTime(2)), SimTime::ZERO);
}

#[test]
fn sim_time_scales_by_fraction() {
    let target = SimTime::from_millis(5);
    assert_eq!(target.mul_f64(2.5), SimTime(12_500_000));
    assert_eq!(SimTime::from_millis(100).mul_f64(1.5), SimTime::from_millis(150));
    assert_eq!(target.mul_f64(0.0), SimTime::ZERO);
    assert_eq!(target.mul_f64(-1.0), SimTime::ZERO);
    assert_eq!(target.mul_f64(f64::NAN), SimTime::ZERO);
}

#[test]
fn sim_time_displays_milliseconds() {
    assert_eq!(SimTime(112_500_000).to_string(), "112.500ms");
    assert_eq!(SimTime::from_millis(112).as_millis_f64(), 112.0);
}
