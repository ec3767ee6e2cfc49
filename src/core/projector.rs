use crate::core::dataset::Dataset;
use crate::core::scale::Scale;
use crate::core::types::Point;

/// Composes a property accessor with a scale's forward transform.
///
/// The returned closure yields pixel values and `None` for data the scale
/// cannot place.
pub fn scaled_accessor<'a, T, S, A>(
    accessor: A,
    scale: &'a S,
) -> impl Fn(&T, usize, &Dataset<T>) -> Option<f64> + 'a
where
    T: 'a,
    S: Scale,
    A: Fn(&T, usize, &Dataset<T>) -> S::Value + 'a,
{
    move |datum, index, dataset| scale.project(&accessor(datum, index, dataset))
}

/// Pixel position of one datum from a pair of scaled accessors.
///
/// Positions are always derived from the datum's identity (datum, index,
/// dataset) when asked for, never cached on the datum.
pub fn pixel_point<T, X, Y>(
    x: &X,
    y: &Y,
    datum: &T,
    index: usize,
    dataset: &Dataset<T>,
) -> Option<Point>
where
    X: Fn(&T, usize, &Dataset<T>) -> Option<f64> + ?Sized,
    Y: Fn(&T, usize, &Dataset<T>) -> Option<f64> + ?Sized,
{
    let point = Point::new(x(datum, index, dataset)?, y(datum, index, dataset)?);
    point.is_finite().then_some(point)
}
