// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use ndarray::prelude::*;
use vec1::{vec1, Vec1};

use super::*;
use crate::{
    c64,
    constants::{MWA_LAT_RAD, VEL_C},
    coord::{y_shaped_array, RADec, UVW},
};

fn test_samples() -> (Array2<f64>, Array1<c64>) {
    let positions = array![
        [10.0, -3.0, 3.0],
        [-2.5, 7.0, 1.0],
        [0.0, 1.0, 4.0],
        [4.0, 4.0, 1.0],
    ];
    let values = array![
        c64::new(1.0, 0.0),
        c64::new(0.0, 2.0),
        c64::new(-3.0, 0.5),
        c64::new(0.25, -4.0),
    ];
    (positions, values)
}

#[test]
fn test_rotate_to_zero_w_is_rotate_phase_at_centre() {
    let (positions, values) = test_samples();
    let zero_w = rotate_to_zero_w(positions.view(), values.view()).unwrap();
    let centre = rotate_phase(positions.view(), 0.0, 0.0, values.view()).unwrap();
    assert_eq!(zero_w, centre);
}

#[test]
fn test_rotate_to_zero_w_values() {
    let (mut positions, values) = test_samples();
    // Integer w values leave the phase alone.
    let rotated = rotate_to_zero_w(positions.view(), values.view()).unwrap();
    assert_abs_diff_eq!(rotated, values, epsilon = 1e-12);

    positions.column_mut(2).fill(0.25);
    let rotated = rotate_to_zero_w(positions.view(), values.view()).unwrap();
    for (r, v) in rotated.iter().zip(values.iter()) {
        assert_abs_diff_eq!(*r, v * c64::new(0.0, 1.0), epsilon = 1e-12);
    }
}

#[test]
fn test_rotate_phase_is_reversible() {
    let (positions, values) = test_samples();
    let rotated = rotate_phase(positions.view(), 0.1, -0.2, values.view()).unwrap();
    assert_abs_diff_eq!(rotated.mapv(|v| v.norm()), values.mapv(|v| v.norm()), epsilon = 1e-12);
    let negated = positions.mapv(|p| -p);
    let back = rotate_phase(negated.view(), 0.1, -0.2, rotated.view()).unwrap();
    assert_abs_diff_eq!(back, values, epsilon = 1e-12);
}

#[test]
fn test_rotate_phase_errors() {
    let (positions, values) = test_samples();
    assert_eq!(
        rotate_phase(positions.view(), 0.8, 0.8, values.view()),
        Err(VisError::DirectionCosineDomain { l: 0.8, m: 0.8 })
    );
    assert!(matches!(
        rotate_phase(positions.view(), f64::NAN, 0.0, values.view()),
        Err(VisError::DirectionCosineDomain { .. })
    ));
    // The edge of the sky is fine.
    assert!(rotate_phase(positions.view(), 1.0, 0.0, values.view()).is_ok());

    assert_eq!(
        rotate_phase(positions.slice(s![.., ..2]), 0.0, 0.0, values.view()),
        Err(VisError::TooFewColumns(2))
    );
    assert_eq!(
        rotate_phase(positions.view(), 0.0, 0.0, values.slice(s![..3])),
        Err(VisError::SampleCountMismatch {
            positions: 4,
            values: 3
        })
    );
}

#[test]
fn test_sort_by_w() {
    // w = [3, 1, 4, 1].
    let (positions, values) = test_samples();
    assert_eq!(w_sort_order(positions.view()).unwrap(), vec![1, 3, 0, 2]);

    let (sorted_positions, sorted_values) = sort_by_w(positions.view(), values.view()).unwrap();
    assert_eq!(sorted_positions.column(2), array![1.0, 1.0, 3.0, 4.0]);
    assert_eq!(sorted_positions.row(0), positions.row(1));
    assert_eq!(sorted_positions.row(1), positions.row(3));
    assert_eq!(
        sorted_values,
        array![values[1], values[3], values[0], values[2]]
    );
}

#[test]
fn test_sort_by_w_is_a_permutation() {
    let positions = Array2::from_shape_fn((50, 3), |(i, j)| ((i * 37 + j * 11) % 23) as f64 - 11.0);
    let values = Array1::from_shape_fn(50, |i| c64::new(i as f64, 0.0));
    let (sorted_positions, sorted_values) = sort_by_w(positions.view(), values.view()).unwrap();

    let ws = sorted_positions.column(2);
    assert!(ws.windows(2).into_iter().all(|w| w[0] <= w[1]));

    // Each value is its original index, so the values spell the permutation.
    let mut seen = vec![false; 50];
    for (position, value) in sorted_positions.outer_iter().zip(sorted_values.iter()) {
        let i = value.re as usize;
        assert!(!seen[i]);
        seen[i] = true;
        assert_eq!(position, positions.row(i));
    }
    assert!(seen.into_iter().all(|s| s));
}

#[test]
fn test_sort_by_w_errors() {
    let (positions, values) = test_samples();
    assert_eq!(
        w_sort_order(positions.slice(s![.., ..2])),
        Err(VisError::TooFewColumns(2))
    );
    assert!(matches!(
        sort_by_w(positions.view(), values.slice(s![..1])),
        Err(VisError::SampleCountMismatch { .. })
    ));
}

fn small_table(freqs: Vec1<f64>, first_antenna: usize) -> Visibilities {
    let num_chans = freqs.len();
    Visibilities::new(
        vec![
            UVW::from([100.0, -50.0, 2.0]),
            UVW::from([-20.0, 30.0, -1.0]),
        ],
        vec![0.0, 8.0],
        vec![first_antenna, first_antenna],
        vec![first_antenna + 1, first_antenna + 2],
        Array2::from_shape_fn((2, num_chans), |(i, j)| c64::new(i as f64, j as f64)),
        Array2::ones((2, num_chans)),
        freqs,
        RADec::new_degrees(0.0, -27.0),
    )
    .unwrap()
}

#[test]
fn test_visibilities_new_validates() {
    let freqs = vec1![150e6];
    let uvws = vec![UVW::default(); 2];
    let result = Visibilities::new(
        uvws.clone(),
        vec![0.0, 1.0],
        vec![0, 0],
        vec![1],
        Array2::zeros((2, 1)),
        Array2::ones((2, 1)),
        freqs.clone(),
        RADec::new(0.0, 0.0),
    );
    assert_eq!(
        result,
        Err(VisError::ShapeMismatch {
            what: "rows of antenna2",
            expected: 2,
            got: 1
        })
    );

    let result = Visibilities::new(
        uvws.clone(),
        vec![0.0, 1.0],
        vec![0, 0],
        vec![1, 2],
        Array2::zeros((2, 2)),
        Array2::ones((2, 1)),
        freqs.clone(),
        RADec::new(0.0, 0.0),
    );
    assert_eq!(
        result,
        Err(VisError::ShapeMismatch {
            what: "visibility channels",
            expected: 1,
            got: 2
        })
    );

    let result = Visibilities::new(
        vec![],
        vec![],
        vec![],
        vec![],
        Array2::zeros((0, 1)),
        Array2::ones((0, 1)),
        freqs,
        RADec::new(0.0, 0.0),
    );
    assert_eq!(result, Err(VisError::Empty));
}

#[test]
fn test_visibilities_samples() {
    let vis = small_table(vec1![VEL_C, 2.0 * VEL_C], 0);
    let (positions, values) = vis.samples();
    assert_eq!(positions.dim(), (4, 3));
    assert_eq!(values.len(), 4);

    // Wavelengths of 1 m and 0.5 m.
    assert_abs_diff_eq!(positions.row(0), array![100.0, -50.0, 2.0], epsilon = 1e-10);
    assert_abs_diff_eq!(positions.row(1), array![200.0, -100.0, 4.0], epsilon = 1e-10);
    assert_abs_diff_eq!(positions.row(2), array![-20.0, 30.0, -1.0], epsilon = 1e-10);
    assert_abs_diff_eq!(positions.row(3), array![-40.0, 60.0, -2.0], epsilon = 1e-10);
    assert_eq!(
        values,
        array![
            c64::new(0.0, 0.0),
            c64::new(0.0, 1.0),
            c64::new(1.0, 0.0),
            c64::new(1.0, 1.0)
        ]
    );
}

#[test]
fn test_visibilities_unflagged_samples() {
    let vis = small_table(vec1![VEL_C, 2.0 * VEL_C], 0);
    let mut weights = vis.weights().to_owned();
    weights[(0, 1)] = 0.0;
    weights[(1, 0)] = -1.0;
    let vis = Visibilities::new(
        vis.uvws().to_vec(),
        vis.times().to_vec(),
        vis.antenna1().to_vec(),
        vis.antenna2().to_vec(),
        vis.vis().to_owned(),
        weights,
        vis.freqs().clone(),
        vis.phase_centre(),
    )
    .unwrap();

    let (positions, values) = vis.unflagged_samples();
    assert_eq!(positions.dim(), (2, 3));
    assert_abs_diff_eq!(positions.row(0), array![100.0, -50.0, 2.0], epsilon = 1e-10);
    assert_abs_diff_eq!(positions.row(1), array![-40.0, 60.0, -2.0], epsilon = 1e-10);
    assert_eq!(values, array![c64::new(0.0, 0.0), c64::new(1.0, 1.0)]);
}

#[test]
fn test_visibilities_add() {
    let a = small_table(vec1![150e6, 151e6], 0);
    let b = small_table(vec1![150e6 + 0.5, 151e6 - 0.5], 3);
    let sum = a.add(&b).unwrap();
    assert_eq!(sum.num_rows(), 4);
    assert_eq!(sum.num_chans(), 2);
    assert_eq!(sum.antenna1(), &[0, 0, 3, 3]);
    assert_eq!(sum.antenna2(), &[1, 2, 4, 5]);
    assert_eq!(sum.times(), &[0.0, 8.0, 0.0, 8.0]);
    assert_eq!(sum.vis().slice(s![2.., ..]), b.vis());
    assert_eq!(sum.freqs(), a.freqs());

    let c = small_table(vec1![150e6, 152e6], 0);
    assert_eq!(a.add(&c), Err(VisError::FreqMismatch));
    let d = small_table(vec1![150e6], 0);
    assert_eq!(a.add(&d), Err(VisError::FreqMismatch));

    let e = Visibilities::new(
        a.uvws().to_vec(),
        a.times().to_vec(),
        a.antenna1().to_vec(),
        a.antenna2().to_vec(),
        a.vis().to_owned(),
        a.weights().to_owned(),
        a.freqs().clone(),
        RADec::new_degrees(10.0, -27.0),
    )
    .unwrap();
    assert!(matches!(a.add(&e), Err(VisError::DirectionMismatch(_, _))));

    // Phase centres that differ by rounding are the same direction.
    let f = Visibilities::new(
        a.uvws().to_vec(),
        a.times().to_vec(),
        a.antenna1().to_vec(),
        a.antenna2().to_vec(),
        a.vis().to_owned(),
        a.weights().to_owned(),
        a.freqs().clone(),
        RADec::new(
            a.phase_centre().ra + 1e-15,
            a.phase_centre().dec - 1e-15,
        ),
    )
    .unwrap();
    assert_eq!(a.add(&f).unwrap().num_rows(), 4);
}

#[test]
fn test_visibilities_json() {
    let vis = small_table(vec1![150e6, 151e6], 0);
    let json = serde_json::to_string(&vis).unwrap();
    assert!(json.contains("\"rows\""));
    assert!(json.contains("\"phase_centre\""));

    let back: Visibilities = serde_json::from_str(&json).unwrap();
    assert_eq!(back.num_rows(), 2);
    assert_eq!(back.antenna2(), vis.antenna2());
    assert_abs_diff_eq!(back.vis(), vis.vis(), epsilon = 1e-12);
    // The phase centre is stored exactly.
    assert_eq!(back.phase_centre(), vis.phase_centre());
    assert_abs_diff_eq!(back.uvws()[0].u, 100.0, epsilon = 1e-12);
}

#[test]
fn test_visibilities_json_is_validated() {
    // The second row is missing a channel.
    let json = r#"{
        "phase_centre": {"ra": 0.0, "dec": -0.47},
        "freqs": [150e6, 151e6],
        "rows": [
            {"uvw": [1, 2, 3], "time": 0, "antenna1": 0, "antenna2": 1,
             "vis": [[1, 0], [0, 1]], "weights": [1, 1]},
            {"uvw": [1, 2, 3], "time": 0, "antenna1": 0, "antenna2": 2,
             "vis": [[1, 0]], "weights": [1, 1]}
        ]
    }"#;
    let result = serde_json::from_str::<Visibilities>(json);
    assert!(result.is_err());

    let json = r#"{"phase_centre": {"ra": 0.0, "dec": -0.47}, "freqs": [150e6], "rows": []}"#;
    let result = serde_json::from_str::<Visibilities>(json);
    assert!(result.unwrap_err().to_string().contains("no visibilities"));

    let json = r#"{"phase_centre": {"ra": 0.0, "dec": -0.47}, "freqs": [], "rows": []}"#;
    assert!(serde_json::from_str::<Visibilities>(json).is_err());
}

#[test]
fn test_simulate_source_at_phase_centre() {
    let xyzs = y_shaped_array(2, 300.0, MWA_LAT_RAD);
    let vis = simulate_visibilities(
        &xyzs,
        &[-0.1, 0.0, 0.1],
        RADec::new(0.0, -0.3),
        vec1![150e6, 180e6],
        &[PointSource {
            l: 0.0,
            m: 0.0,
            flux: 2.5,
        }],
    )
    .unwrap();
    assert_eq!(vis.num_rows(), 3 * 15);
    assert_eq!(vis.num_chans(), 2);
    assert_eq!(&vis.antenna1()[..5], &[0, 0, 0, 0, 0]);
    assert_eq!(&vis.antenna2()[..5], &[1, 2, 3, 4, 5]);
    assert_abs_diff_eq!(vis.times()[15], 0.0);
    assert!(vis.weights().iter().all(|&w| w == 1.0));

    // Rotating to the zero-w plane removes all phase for a source at the
    // phase centre.
    let (positions, values) = vis.samples();
    let rotated = rotate_to_zero_w(positions.view(), values.view()).unwrap();
    for v in rotated.iter() {
        assert_abs_diff_eq!(*v, c64::new(2.5, 0.0), epsilon = 1e-9);
    }
}

#[test]
fn test_simulate_source_off_centre() {
    let xyzs = y_shaped_array(2, 300.0, MWA_LAT_RAD);
    let (l, m) = (0.05, -0.02);
    let vis = simulate_visibilities(
        &xyzs,
        &[0.0, 0.2],
        RADec::new(0.0, -0.5),
        vec1![150e6],
        &[
            PointSource { l, m, flux: 1.0 },
            PointSource {
                l: 0.0,
                m: 0.0,
                flux: 0.0,
            },
        ],
    )
    .unwrap();

    // Rotating to the source direction makes every visibility its flux.
    let (positions, values) = vis.samples();
    let rotated = rotate_phase(positions.view(), l, m, values.view()).unwrap();
    for v in rotated.iter() {
        assert_abs_diff_eq!(*v, c64::new(1.0, 0.0), epsilon = 1e-9);
    }
}

#[test]
fn test_simulate_errors() {
    let xyzs = y_shaped_array(1, 100.0, MWA_LAT_RAD);
    let result = simulate_visibilities(
        &xyzs,
        &[0.0],
        RADec::new(0.0, 0.0),
        vec1![150e6],
        &[PointSource {
            l: 1.0,
            m: 0.5,
            flux: 1.0,
        }],
    );
    assert_eq!(
        result,
        Err(VisError::DirectionCosineDomain { l: 1.0, m: 0.5 })
    );

    // No hour angles means no rows.
    let result = simulate_visibilities(&xyzs, &[], RADec::new(0.0, 0.0), vec1![150e6], &[]);
    assert_eq!(result, Err(VisError::Empty));
}
