//! Shader built-ins through the public API.

use lockstep::{Float, Int, Native, Scalar, Uint};
use std::f32::consts::PI;

type F = Float<Native, 2>;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-5 * b.abs().max(1.0)
}

#[test]
fn round_even_sends_ties_to_even() {
    let x = Float::<Scalar, 8>::from([2.5, 3.5, -2.5, -3.5, 0.5, 1.5, 2.4, -2.6]);
    assert_eq!(
        x.round_even().to_vec(),
        vec![2.0, 4.0, -2.0, -4.0, 0.0, 2.0, 2.0, -3.0]
    );
}

#[test]
fn round_even_without_ties_is_round() {
    let x = F::from_fn(|i| i as f32 * 0.3 - 1.13);
    assert_eq!(x.round_even(), x.round());
}

#[test]
fn modulo_takes_the_sign_of_the_divisor() {
    let x = Float::<Scalar, 4>::from([-3.0, 3.0, 7.5, -7.5]);
    let y = Float::<Scalar, 4>::from([4.0, -4.0, 2.0, 2.0]);
    assert_eq!(x.modulo(y).to_vec(), vec![1.0, -1.0, 1.5, 0.5]);
}

#[test]
fn modf_splits_whole_and_fraction() {
    let x = Float::<Scalar, 3>::from([2.75, -1.25, f32::INFINITY]);
    let (fract, whole) = x.modf();
    assert_eq!(whole.to_vec(), vec![2.0, -1.0, f32::INFINITY]);
    assert_eq!(fract.to_vec(), vec![0.75, -0.25, 0.0]);
}

#[test]
fn interpolation() {
    let x = F::from_fn(|i| i as f32 / 4.0);
    let m = F::splat(10.0).mix(20.0, x);
    let s = F::splat(0.0).smoothstep(1.0, x);
    let e = F::splat(0.5).step(x);
    for i in 0..F::WIDTH {
        let t = x.lane(i);
        assert!(close(m.lane(i), 10.0 + 10.0 * t));
        let c = t.clamp(0.0, 1.0);
        assert!(close(s.lane(i), c * c * (3.0 - 2.0 * c)));
        assert_eq!(e.lane(i), if t > 0.5 { 1.0 } else { 0.0 });
    }
}

#[test]
fn trig_and_angles() {
    let deg = F::from_fn(|i| i as f32 * 45.0);
    let rad = deg.radians();
    for i in 0..F::WIDTH {
        assert!(close(rad.lane(i), deg.lane(i) * PI / 180.0));
    }
    assert!(close(rad.degrees().lane(1), 45.0));
    let s = rad.sin();
    let c = rad.cos();
    let one = s * s + c * c;
    assert!(one.to_vec().iter().all(|v| close(*v, 1.0)));
    assert!(close(F::splat(1.0).atan2(-1.0).lane(0), 3.0 * PI / 4.0));
}

#[test]
fn exponentials() {
    let x = F::from_fn(|i| i as f32 + 1.0);
    assert!(x.exp2().log2().to_vec().iter().zip(x.to_vec()).all(|(a, b)| close(*a, b)));
    assert!(x.exp().log().to_vec().iter().zip(x.to_vec()).all(|(a, b)| close(*a, b)));
    assert_eq!(F::splat(16.0).inverse_sqrt().lane(0), 0.25);
    assert_eq!(F::splat(2.0).pow(10.0).lane(0), 1024.0);
}

#[test]
fn geometry_on_one_component() {
    let n = Float::<Scalar, 2>::from([1.0, -1.0]);
    assert_eq!(n.normalize().to_vec(), vec![1.0, -1.0]);
    assert_eq!(n.length().to_vec(), vec![1.0, 1.0]);
    assert_eq!(Float::<Scalar, 2>::splat(3.0).distance(n).to_vec(), vec![2.0, 4.0]);

    let i = Float::<Scalar, 2>::splat(-2.0);
    assert_eq!(i.reflect(n).to_vec(), vec![2.0, 2.0]);
    assert_eq!(n.faceforward(i, n).to_vec(), vec![1.0, 1.0]);

    let k_negative = Float::<Scalar, 2>::splat(0.5).refract(1.0, 4.0);
    assert_eq!(k_negative.to_vec(), vec![0.0, 0.0]);
}

#[test]
fn integer_builtins() {
    let x = Int::<Scalar, 4>::from([-5, 0, 3, i32::MIN]);
    assert_eq!(x.abs().to_vec(), vec![5, 0, 3, i32::MIN]);
    assert_eq!(x.sign().to_vec(), vec![-1, 0, 1, -1]);
    assert_eq!(x.clamp(-2, 2).to_vec(), vec![-2, 0, 2, -2]);

    let u = Uint::<Native, 1>::splat(9);
    assert_eq!(u.min(4u32).lane(0), 4);
    assert_eq!(u.max(u32::MAX).lane(0), u32::MAX);
}

#[test]
fn classification() {
    let x = Float::<Scalar, 4>::from([0.0, f32::NAN, f32::NEG_INFINITY, 1.0]);
    assert_eq!(x.is_nan().to_vec(), vec![false, true, false, false]);
    assert_eq!(x.is_inf().to_vec(), vec![false, false, true, false]);
}
