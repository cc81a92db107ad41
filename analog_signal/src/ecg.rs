//! Stylized electrocardiogram trace.
//!
//! The trace is drawn on a 100 x 55 canvas as a chain of cubic Bézier
//! segments. The signal is the region enclosed by the trace and the time axis.
//! A point lies below the signal if it is inside that region according to the
//! nonzero winding rule.

use core::ops::RangeInclusive;

use super::ContinuousSignal;

type Point = [f64; 2];

const CANVAS: Point = [100.0, 55.0];

const START: Point = [0.0, 3.0];

/// Trace segments as (control point 1, control point 2, end point).
/// Each segment starts at the end point of the previous one.
const TRACE: [[Point; 3]; 14] = [
    [[1.1, 2.62], [1.82, 2.58], [2.16, 2.55]],
    [[8.95, 1.97], [13.64, 5.28], [16.33, 5.28]],
    [[19.02, 5.28], [20.81, 1.1], [22.72, 1.79]],
    [[24.63, 2.48], [25.02, 2.83], [27.17, 1.92]],
    [[29.31, 1.01], [28.5, 4.7], [31.24, 2.54]],
    // QRS complex
    [[33.98, 0.39], [34.2, 55.0], [35.78, 55.0]],
    [[37.35, 55.0], [37.99, 2.78], [39.55, 1.79]],
    [[41.11, 0.8], [41.14, 9.86], [42.44, 8.33]],
    [[43.75, 6.8], [43.72, 2.78], [46.06, 5.28]],
    [[48.4, 7.78], [48.56, 5.05], [51.89, 6.64]],
    // T wave
    [[55.22, 8.24], [60.95, 16.28], [66.34, 23.36]],
    [[71.72, 30.44], [74.85, 15.41], [78.56, 7.71]],
    [[82.28, 0.01], [87.42, 1.74], [92.73, 3.09]],
    [[94.63, 3.58], [97.06, 3.55], [100.0, 3.0]],
];

/// Line segments per Bézier segment.
const FLATTEN: usize = 16;

fn cubic(p: [Point; 4], t: f64) -> Point {
    let u = 1.0 - t;
    let w = [u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t];
    let mut r = [0.0; 2];
    for (i, ri) in r.iter_mut().enumerate() {
        *ri = w.iter().zip(p.iter()).map(|(w, p)| w * p[i]).sum();
    }
    r
}

/// Vertices of the closed outline: origin, up to the trace start, along
/// the trace, down to the axis.
fn outline() -> impl Iterator<Item = Point> {
    let trace = TRACE
        .iter()
        .scan(START, |p0, &[c1, c2, p1]| {
            let p = [*p0, c1, c2, p1];
            *p0 = p1;
            Some((1..=FLATTEN).map(move |k| cubic(p, k as f64 / FLATTEN as f64)))
        })
        .flatten();
    [[0.0, 0.0], START]
        .into_iter()
        .chain(trace)
        .chain([[CANVAS[0], 0.0]])
}

/// Signed area test: positive if `p` is left of the directed line `a -> b`.
fn is_left(a: Point, b: Point, p: Point) -> f64 {
    (b[0] - a[0]) * (p[1] - a[1]) - (p[0] - a[0]) * (b[1] - a[1])
}

fn winding_number(p: Point) -> i32 {
    let mut wn = 0;
    let mut vertices = outline();
    let Some(first) = vertices.next() else {
        return 0;
    };
    let mut a = first;
    for b in vertices.chain([first]) {
        if a[1] <= p[1] {
            if b[1] > p[1] && is_left(a, b, p) > 0.0 {
                wn += 1;
            }
        } else if b[1] <= p[1] && is_left(a, b, p) < 0.0 {
            wn -= 1;
        }
        a = b;
    }
    wn
}

/// ECG like test signal of 0.7 s duration and 20 mV peak.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ecg;

impl Ecg {
    /// Signal duration in seconds.
    pub const DURATION: f64 = 0.7;

    /// Full scale signal value in volts.
    pub const VOLTAGE: f64 = 0.02;

    pub fn new() -> Self {
        Self
    }

    fn to_canvas(time: f64, value: f64) -> Point {
        [
            time / Self::DURATION * CANVAS[0],
            value / Self::VOLTAGE * CANVAS[1],
        ]
    }

    /// Whether the point `(time, value)` lies within the area under the trace.
    pub fn contains(&self, time: f64, value: f64) -> bool {
        winding_number(Self::to_canvas(time, value)) != 0
    }
}

impl ContinuousSignal for Ecg {
    fn time_range(&self) -> RangeInclusive<f64> {
        0.0..=Self::DURATION
    }

    fn value_range(&self) -> RangeInclusive<f64> {
        0.0..=Self::VOLTAGE
    }

    fn is_below(&self, time: f64, value: f64) -> bool {
        !self.contains(time, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_closed() {
        assert_eq!(outline().count(), 3 + TRACE.len() * FLATTEN);
        assert_eq!(outline().last(), Some([100.0, 0.0]));
        let end = outline().nth(1 + TRACE.len() * FLATTEN).unwrap();
        assert!((end[0] - 100.0).abs() < 1e-9 && (end[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn baseline() {
        let ecg = Ecg::new();
        // Trace starts at 3/55 of full scale
        let v0 = 3.0 / 55.0 * Ecg::VOLTAGE;
        assert!(ecg.contains(0.001, v0 * 0.9));
        assert!(ecg.is_below(0.001, v0 * 1.1));
    }

    #[test]
    fn peak() {
        let ecg = Ecg::new();
        let t = 35.78 / 100.0 * Ecg::DURATION;
        assert!(ecg.contains(t, 0.019));
        assert!(ecg.is_below(t, 0.0201));
        // Between the peaks the signal is low
        assert!(ecg.is_below(0.28, 0.002));
        // Second (T wave) peak
        assert!(ecg.contains(0.47, 0.008));
        assert!(ecg.is_below(0.47, 0.012));
    }

    #[test]
    fn outside() {
        let ecg = Ecg::new();
        assert!(ecg.is_below(-0.1, 0.001));
        assert!(ecg.is_below(0.8, 0.001));
        assert!(ecg.is_below(0.3, 0.03));
    }
}
