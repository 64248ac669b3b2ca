use nalgebra as na;
use num_traits::Float;

pub fn quadratic_ls<T: na::ComplexField + Float>(
    x: &na::DVector<T>,
    y: &na::DVector<T>,
) -> Option<na::Matrix3x1<T>> {
    if x.len() < 3 || x.len() != y.len() {
        return None;
    }

    let n = T::from(x.len())?;

    let s_x1 = x.sum();
    let x2 = x.map(|x| x * x);
    let s_x2 = x2.sum();
    let x3 = x2.zip_map(x, |a, b| a * b);
    let s_x3 = x3.sum();
    let x4 = x3.zip_map(x, |a, b| a * b);
    let s_x4 = x4.sum();
    let s_x2y = x2.zip_map(y, |x, y| x * y).sum();
    let s_xy = x.zip_map(y, |x, y| x * y).sum();
    let s_y = y.sum();

    let a = na::Matrix3::new(s_x4, s_x3, s_x2, s_x3, s_x2, s_x1, s_x2, s_x1, n);
    let b = na::Matrix3x1::new(s_x2y, s_xy, s_y);

    let qr_result = a.qr();
    let qty = qr_result.q().transpose() * b;

    qr_result.r().solve_upper_triangular(&qty)
}

pub fn gauss(x: f64, c: f64) -> f64 {
    (-((x * x) / (2.0 * c * c))).exp()
}

/// Root mean square of `y - f(x)` over the samples
pub fn rms_residual<F: Fn(f64) -> f64>(points: &[na::Point2<f64>], f: F) -> f64 {
    if points.is_empty() {
        return 0.0;
    }

    let sum: f64 = points
        .iter()
        .map(|p| {
            let r = p.y - f(p.x);
            r * r
        })
        .sum();

    (sum / points.len() as f64).sqrt()
}

/// Mean x advance over the first `pairs` consecutive point pairs
pub fn mean_x_step(points: &[na::Point2<f64>], pairs: usize) -> Option<f64> {
    if pairs == 0 || points.len() <= pairs {
        return None;
    }

    let sum: f64 = points[..=pairs].windows(2).map(|w| w[1].x - w[0].x).sum();

    Some(sum / pairs as f64)
}
