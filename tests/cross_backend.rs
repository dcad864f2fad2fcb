//! The native backend must agree with the scalar backend lane for lane.
//!
//! Arithmetic, rounding and square roots are correctly rounded on both, and
//! transcendentals go through the same libm routine per lane, so results are
//! compared bit for bit (NaN matches NaN).

use lockstep::{Float, Int, Native, Scalar, Uint};

const N: usize = 4;
type Wide = Float<Native, N>;
type One = Float<Scalar, 1>;

fn inputs(offset: usize) -> Wide {
    const VALUES: [f32; 16] = [
        0.0, -0.0, 0.5, -0.5, 1.5, -2.5, 3.75, -100.25, 1e-3, 7e6, -7e6, 0.999, 2.0, -1.0, 42.0,
        f32::INFINITY,
    ];
    Wide::from_fn(|i| VALUES[(i + offset) % VALUES.len()])
}

fn same(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

fn check_unary(
    name: &str,
    native: impl Fn(Wide) -> Wide,
    scalar: impl Fn(One) -> One,
) {
    for offset in [0, 3, 7] {
        let x = inputs(offset);
        let got = native(x);
        for i in 0..Wide::WIDTH {
            let want = scalar(One::splat(x.lane(i))).lane(0);
            assert!(
                same(got.lane(i), want),
                "{name}({}) lane {i}: {} vs {want}",
                x.lane(i),
                got.lane(i)
            );
        }
    }
}

fn check_binary(
    name: &str,
    native: impl Fn(Wide, Wide) -> Wide,
    scalar: impl Fn(One, One) -> One,
) {
    let x = inputs(0);
    let y = inputs(5);
    let got = native(x, y);
    for i in 0..Wide::WIDTH {
        let want = scalar(One::splat(x.lane(i)), One::splat(y.lane(i))).lane(0);
        assert!(same(got.lane(i), want), "{name} lane {i}: {} vs {want}", got.lane(i));
    }
}

#[test]
fn arithmetic_matches() {
    check_binary("add", |a, b| a + b, |a, b| a + b);
    check_binary("sub", |a, b| a - b, |a, b| a - b);
    check_binary("mul", |a, b| a * b, |a, b| a * b);
    check_binary("div", |a, b| a / b, |a, b| a / b);
    check_unary("neg", |a| -a, |a| -a);
}

#[test]
fn rounding_matches() {
    check_unary("floor", Wide::floor, One::floor);
    check_unary("ceil", Wide::ceil, One::ceil);
    check_unary("trunc", Wide::trunc, One::trunc);
    check_unary("round", Wide::round, One::round);
    check_unary("round_even", Wide::round_even, One::round_even);
    check_unary("fract", Wide::fract, One::fract);
    check_unary("abs", Wide::abs, One::abs);
    check_unary("sign", Wide::sign, One::sign);
    check_binary("mod", |a, b| a.modulo(b), |a, b| a.modulo(b));
    check_binary("min", |a, b| a.min(b), |a, b| a.min(b));
    check_binary("max", |a, b| a.max(b), |a, b| a.max(b));
}

#[test]
fn transcendentals_match() {
    check_unary("sqrt", Wide::sqrt, One::sqrt);
    check_unary("inverse_sqrt", Wide::inverse_sqrt, One::inverse_sqrt);
    check_unary("exp", Wide::exp, One::exp);
    check_unary("exp2", Wide::exp2, One::exp2);
    check_unary("log", Wide::log, One::log);
    check_unary("log2", Wide::log2, One::log2);
    check_unary("sin", Wide::sin, One::sin);
    check_unary("cos", Wide::cos, One::cos);
    check_unary("tan", Wide::tan, One::tan);
    check_unary("atan", Wide::atan, One::atan);
    check_unary("tanh", Wide::tanh, One::tanh);
    check_binary("pow", |a, b| a.pow(b), |a, b| a.pow(b));
    check_binary("atan2", |a, b| a.atan2(b), |a, b| a.atan2(b));
}

#[test]
fn casts_match() {
    let x = inputs(0) * 1e3;
    let ints = x.cast::<i32>();
    let uints = x.cast::<u32>();
    for i in 0..Wide::WIDTH {
        let scalar = One::splat(x.lane(i));
        assert_eq!(ints.lane(i), scalar.cast::<i32>().lane(0));
        assert_eq!(uints.lane(i), scalar.cast::<u32>().lane(0));
    }
}

#[test]
fn integer_ops_match() {
    let a = Int::<Native, N>::from_fn(|i| (i as i32 - 7) * 123_457);
    let b = Int::<Native, N>::from_fn(|i| i as i32 % 5 + 1);
    let mixed = (a * b + a / b - (a % b)) ^ (a >> 3) | (b << 4);
    for i in 0..Int::<Native, N>::WIDTH {
        let (x, y) = (a.lane(i), b.lane(i));
        let want = (x.wrapping_mul(y) + x / y - x % y) ^ (x >> 3) | (y << 4);
        assert_eq!(mixed.lane(i), want, "lane {i}");
    }

    let u = Uint::<Native, N>::from_fn(|i| u32::MAX - i as u32 * 1_000_003);
    let below = u.cmp_lt(u32::MAX / 2);
    for i in 0..Uint::<Native, N>::WIDTH {
        assert_eq!(below.lane(i), u.lane(i) < u32::MAX / 2);
    }
}
