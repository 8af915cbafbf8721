extern crate ccdiag;
extern crate num;

use ccdiag::{Arith, Conf, Engine, Error, PointGroup, SpinorInfo, SpinorSpace};
use ccdiag::io::heff;
use num::complex::Complex64;

/// Abelian group with four irreps, `a ⊗ b = a xor b`.
fn klein_group() -> PointGroup {
    let names = ["a", "b1", "b2", "b3"].iter().map(|s| s.to_string()).collect();
    let table = (0 .. 16).map(|i| (i / 4) ^ (i % 4)).collect();
    PointGroup::from_table(names, table).unwrap()
}

/// One active hole (even index) and one active particle (odd index) per
/// irrep.
fn klein_space() -> SpinorSpace {
    let mut spinors = Vec::new();
    for irrep in 0 .. 4 {
        for &occupied in &[true, false] {
            spinors.push(SpinorInfo {
                irrep,
                eps: if occupied { -1.0 } else { 1.0 },
                occupied,
                active: true,
                t3: false,
            });
        }
    }
    SpinorSpace::new(klein_group(), spinors, 0).unwrap()
}

#[test]
fn test_blocks_obey_symmetry() {
    let mut engine = Engine::<Complex64>::new(Conf::default(), klein_space());
    let space = engine.space().clone();
    for &irrep in &[0, 2] {
        let d = engine.tmplt_sym("v", "hhpp", "0000", "1234", false, irrep)
            .unwrap();
        assert!(!d.blocks().is_empty());
        for block in d.blocks() {
            let irreps: Vec<usize> = block.spinor_blocks.iter()
                .map(|&b| space.blocks()[b].irrep)
                .collect();
            assert_eq!(space.group().product_all(irreps), irrep);
        }
    }
    assert_eq!(engine.stack().len(), 1);
    assert_eq!(engine.get("v").unwrap().irrep(), 2);
}

#[test]
fn test_antisymmetric_amplitudes() {
    let conf = Conf { arith: Arith::Real, .. Default::default() };
    let mut engine = Engine::<f64>::new(conf, klein_space());
    engine.tmplt("t2", "hhpp", "0000", "1234", true).unwrap()
        .set(&[0, 2, 1, 3], 0.5).unwrap();
    engine.copy("t2", "t2_old").unwrap();
    let d = engine.get("t2_old").unwrap();
    assert_eq!(d.get(&[0, 2, 1, 3]).unwrap(), 0.5);
    assert_eq!(d.get(&[2, 0, 1, 3]).unwrap(), -0.5);
    assert_eq!(d.get(&[0, 2, 3, 1]).unwrap(), -0.5);
    assert_eq!(d.get(&[2, 0, 3, 1]).unwrap(), 0.5);
    assert!(d.num_unique_blocks() < d.blocks().len());
    assert_eq!(engine.findmax("t2").unwrap().0, 0.5);
    assert_eq!(engine.diffmax("t2", "t2_old").unwrap().0, 0.0);
}

#[test]
fn test_restrict_triples() {
    let conf = Conf { restrict_triples: true, .. Default::default() };
    let mut engine = Engine::<Complex64>::new(conf, klein_space());
    let d = engine.tmplt("t3", "hhhppp", "000000", "123456", false).unwrap();
    assert_eq!(d.t3space_string(), "111111");
    // no spinor is flagged for triples
    assert!(d.blocks().is_empty());
    let d = engine.tmplt("t2", "hhpp", "0000", "1234", false).unwrap();
    assert_eq!(d.t3space_string(), "0000");
    assert!(!d.blocks().is_empty());
}

/// C1 space: hole 0 and particle 2 lie in the triples window, hole 1 and
/// particle 3 do not.
fn triples_space() -> SpinorSpace {
    let spinors = [(true, true), (true, false), (false, true), (false, false)]
        .iter()
        .map(|&(occupied, t3)| SpinorInfo {
            irrep: 0,
            eps: 0.0,
            occupied,
            active: false,
            t3,
        })
        .collect();
    SpinorSpace::new(PointGroup::c1(), spinors, 0).unwrap()
}

#[test]
fn test_triples_window() {
    let conf = Conf { restrict_triples: true, arith: Arith::Real,
                      .. Default::default() };
    let mut engine = Engine::<f64>::new(conf, triples_space());
    {
        let d = engine.tmplt("t3", "hhhppp", "000000", "123456", false)
            .unwrap();
        assert_eq!(d.blocks().len(), 1);
        assert_eq!(d.blocks()[0].shape, vec![1; 6]);
        d.set(&[0, 0, 0, 2, 2, 2], 0.25).unwrap();
        assert_eq!(d.get(&[0, 0, 0, 2, 2, 2]).unwrap(), 0.25);
        assert_eq!(d.get(&[1, 0, 0, 2, 2, 2]).unwrap(), 0.0);
        assert_eq!(d.get(&[0, 0, 0, 2, 2, 3]).unwrap(), 0.0);
        match d.set(&[0, 1, 0, 2, 2, 2], 1.0) {
            Err(Error::ShapeMismatch(_)) => {}
            r => panic!("unexpected: {:?}", r),
        }
        match d.set(&[0, 0, 0, 3, 2, 2], 1.0) {
            Err(Error::ShapeMismatch(_)) => {}
            r => panic!("unexpected: {:?}", r),
        }
    }
    // lower ranks see every spinor
    let d = engine.tmplt("t2", "hhpp", "0000", "1234", false).unwrap();
    assert_eq!(d.blocks().len(), 1);
    assert_eq!(d.blocks()[0].shape, vec![2; 4]);

    // without the restriction, rank 6 sees every spinor too
    let mut engine = Engine::<f64>::new(Conf::default(), triples_space());
    let d = engine.tmplt("t3", "hhhppp", "000000", "123456", false).unwrap();
    assert_eq!(d.blocks()[0].shape, vec![2; 6]);
}

#[test]
fn test_heff_roundtrip() {
    let conf = Conf { arith: Arith::Real, .. Default::default() };
    let mut engine = Engine::<f64>::new(conf, klein_space());
    {
        let d = engine.tmplt("heff", "pp", "11", "12", false).unwrap();
        d.set(&[1, 1], -0.5).unwrap();
        d.set(&[7, 7], 0.75).unwrap();
    }
    let dir = std::env::temp_dir().join(format!(
        "ccdiag_test_engine_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = engine.write_heff("heff", &dir, 0, 1, None).unwrap();
    assert!(path.ends_with("HEFF_0h1p"));
    let contents = heff::read_formatted_heff(&path).unwrap();
    assert_eq!(contents.sector, "0h1p");
    assert_eq!(contents.records.len(), 4);
    let rec = contents.record(4).unwrap();
    assert_eq!(rec.arith, Arith::Real);
    assert_eq!(rec.dim, 1);
    assert_eq!(rec.data, vec![Complex64::new(0.75, 0.0)]);
    assert_eq!(contents.record(1).unwrap().data,
               vec![Complex64::new(-0.5, 0.0)]);

    let path = heff::write_formatted_heff_0h0p(&dir, Arith::Real, -76.25)
        .unwrap();
    let contents = heff::read_formatted_heff(&path).unwrap();
    assert_eq!(contents.sector, "0h0p");
    assert_eq!(contents.record(1).unwrap().data,
               vec![Complex64::new(-76.25, 0.0)]);
    std::fs::remove_dir_all(&dir).unwrap();
}
