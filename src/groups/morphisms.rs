//! Kernels, images, cokernels and homology of homomorphisms between p-local groups.
//!
//! Every reduction rewrites the generators of one group. The caller hands over the
//! matrices that mention those generators: "into" matrices have a row per generator,
//! "out of" matrices a column per generator. They come back expressed in the rewritten
//! generators, and the returned `to_group` and `from_group` use the same ones.

use log::debug;

use super::abelian_group::AbelianGroup;
use super::reduction::{classify, diagonalize, relation_columns, tracked_lists, Columns, Rows};
use crate::base_ring::valuation::{vanishes_in, PAdicValuation, Prime};
use crate::error::{check_dimension, Result};
use crate::linear_algebra::basis_propagator::{BasisPropagator, MatrixList};
use crate::linear_algebra::exact_matrix::ExactMatrix;

/// a group computed from another one, with maps back and forth
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupWithMorphisms<F: PAdicValuation> {
    pub group: AbelianGroup,
    /// from the originating group onto `group`
    pub to_group: ExactMatrix<F>,
    /// from `group` back into the originating group
    pub from_group: ExactMatrix<F>,
}

fn check_morphism_shape<F: PAdicValuation>(
    context: &'static str,
    f: &ExactMatrix<F>,
    domain: &AbelianGroup,
    codomain: &AbelianGroup,
) -> Result<()> {
    check_dimension(context, codomain.rank(), f.height())?;
    check_dimension(context, domain.rank(), f.width())
}

/// Is `h` the zero map into `codomain`?
/// A row for a free generator must vanish, a row for a `Z/p^e` generator
/// must have every entry divisible by `p^e`.
/// # Errors
/// `h` does not have a row per generator of `codomain`
pub fn morphism_zero<F: PAdicValuation>(
    prime: Prime,
    h: &ExactMatrix<F>,
    codomain: &AbelianGroup,
) -> Result<bool> {
    check_dimension("morphism_zero", codomain.rank(), h.height())?;
    Ok((0..h.height()).all(|row| {
        let order = codomain.generator_order(row);
        h.row(row)
            .iter()
            .all(|entry| vanishes_in(entry, prime, order))
    }))
}

/// Do `f` and `g` agree as maps into `codomain`?
/// # Errors
/// the shapes of `f` and `g` differ or do not match `codomain`
pub fn morphism_equal<F: PAdicValuation>(
    prime: Prime,
    f: &ExactMatrix<F>,
    g: &ExactMatrix<F>,
    codomain: &AbelianGroup,
) -> Result<bool> {
    check_dimension("morphism_equal", f.height(), g.height())?;
    check_dimension("morphism_equal", f.width(), g.width())?;
    let difference = ExactMatrix::from_fn(f.height(), f.width(), |row, col| {
        f[(row, col)].clone() - g[(row, col)].clone()
    });
    morphism_zero(prime, &difference, codomain)
}

/// Does `f` send the relations of `domain` to zero in `codomain`?
/// # Errors
/// `f` is not `codomain.rank() x domain.rank()`
pub fn morphism_well_defined<F: PAdicValuation>(
    prime: Prime,
    f: &ExactMatrix<F>,
    domain: &AbelianGroup,
    codomain: &AbelianGroup,
) -> Result<bool> {
    check_morphism_shape("morphism_well_defined", f, domain, codomain)?;
    let relations = relation_columns::<F>(prime, domain);
    let images = f.multiply(&relations)?;
    morphism_zero(prime, &images, codomain)
}

/// Cokernel of `f` into `codomain`, reducing with row operations on `codomain`.
/// The domain of `f` only matters through its image, so any number of columns is accepted.
/// `to_group` is the projection and `from_group` lifts each new generator.
/// # Errors
/// `f` does not have a row per generator of `codomain`,
/// or a tracked matrix does not have `codomain.rank()` rows (into) or columns (out of)
pub fn compute_cokernel<F: PAdicValuation>(
    prime: Prime,
    f: &ExactMatrix<F>,
    codomain: &AbelianGroup,
    into_codomain: MatrixList<'_, F>,
    out_of_codomain: MatrixList<'_, F>,
) -> Result<GroupWithMorphisms<F>> {
    check_dimension("compute_cokernel", codomain.rank(), f.height())?;
    debug!(
        "cokernel at {prime} of a {}x{} map into {codomain}",
        f.height(),
        f.width()
    );
    let mut presentation = f.concat_columns(&relation_columns(prime, codomain))?;
    let mut propagator = BasisPropagator::new(
        codomain.rank(),
        tracked_lists([&mut presentation], into_codomain),
        out_of_codomain,
    )?;
    let pivots = diagonalize::<Rows, F>(prime, &mut propagator)?;
    drop(propagator);

    let (group, kept) = classify(&pivots, codomain.rank())?;
    let to_group = ExactMatrix::identity(codomain.rank()).select_rows(&kept);
    let from_group = to_group.transpose();
    debug!("cokernel is {group}");
    Ok(GroupWithMorphisms {
        group,
        to_group,
        from_group,
    })
}

/// A basis, as columns, of the lattice of `x` with `f x` in the relations of `codomain`.
/// Nothing the caller owns is touched.
fn kernel_lattice<F: PAdicValuation>(
    prime: Prime,
    f: &ExactMatrix<F>,
    codomain: &AbelianGroup,
) -> Result<ExactMatrix<F>> {
    let mut augmented = f.concat_columns(&relation_columns(prime, codomain))?;
    let unknowns = augmented.width();
    let mut tracking = ExactMatrix::identity(unknowns);
    let mut propagator =
        BasisPropagator::new(unknowns, vec![], vec![&mut augmented, &mut tracking])?;
    let pivots = diagonalize::<Columns, F>(prime, &mut propagator)?;
    drop(propagator);

    let domain_coordinates: Vec<usize> = (0..f.width()).collect();
    let solutions: Vec<usize> = (pivots.len()..unknowns).collect();
    Ok(tracking
        .select_rows(&domain_coordinates)
        .select_columns(&solutions))
}

/// Kernel of `f : domain -> codomain`, reducing with row operations on `domain`.
/// `from_group` is the inclusion into `domain`.
/// `to_group` gives coordinates in the kernel, it is only meaningful on elements of the kernel.
/// # Errors
/// `f` is not `codomain.rank() x domain.rank()`,
/// or a tracked matrix does not have `domain.rank()` rows (into) or columns (out of)
pub fn compute_kernel<F: PAdicValuation>(
    prime: Prime,
    f: &ExactMatrix<F>,
    domain: &AbelianGroup,
    codomain: &AbelianGroup,
    into_domain: MatrixList<'_, F>,
    out_of_domain: MatrixList<'_, F>,
) -> Result<GroupWithMorphisms<F>> {
    check_morphism_shape("compute_kernel", f, domain, codomain)?;
    #[cfg(feature = "verify-morphisms")]
    assert!(
        morphism_well_defined(prime, f, domain, codomain)?,
        "kernel of a map {domain} -> {codomain} that is not a homomorphism"
    );
    debug!("kernel at {prime} of a map {domain} -> {codomain}");

    let mut lattice = kernel_lattice(prime, f, codomain)?;
    let mut domain_relations = relation_columns::<F>(prime, domain);
    let mut propagator = BasisPropagator::new(
        domain.rank(),
        tracked_lists([&mut lattice, &mut domain_relations], into_domain),
        out_of_domain,
    )?;
    let lattice_exponents = diagonalize::<Rows, F>(prime, &mut propagator)?;
    drop(propagator);

    // the lattice is now spanned by p^a_j times the j-th rewritten generator
    let kernel_rank = lattice_exponents.len();
    let mut inclusion = ExactMatrix::zero_matrix(domain.rank(), kernel_rank);
    let mut coordinates = ExactMatrix::zero_matrix(kernel_rank, domain.rank());
    for (j, exponent) in lattice_exponents.iter().enumerate() {
        inclusion[(j, j)] = F::prime_power(prime, *exponent);
        coordinates[(j, j)] = F::prime_power(prime, -*exponent);
    }
    let mut kernel_relations = coordinates.multiply(&domain_relations)?;

    let mut propagator = BasisPropagator::new(
        kernel_rank,
        vec![&mut kernel_relations, &mut coordinates],
        vec![&mut inclusion],
    )?;
    let pivots = diagonalize::<Rows, F>(prime, &mut propagator)?;
    drop(propagator);

    let (group, kept) = classify(&pivots, kernel_rank)?;
    debug!("kernel is {group}");
    Ok(GroupWithMorphisms {
        group,
        to_group: coordinates.select_rows(&kept),
        from_group: inclusion.select_columns(&kept),
    })
}

/// Image of `f : domain -> codomain`, as the quotient of `domain` by the kernel,
/// reducing with row operations on `domain`.
/// `to_group` is the projection from `domain`, `from_group` the inclusion into `codomain`.
/// # Errors
/// `f` is not `codomain.rank() x domain.rank()`,
/// or a tracked matrix does not have `domain.rank()` rows (into) or columns (out of)
pub fn compute_image<F: PAdicValuation>(
    prime: Prime,
    f: &ExactMatrix<F>,
    domain: &AbelianGroup,
    codomain: &AbelianGroup,
    into_domain: MatrixList<'_, F>,
    out_of_domain: MatrixList<'_, F>,
) -> Result<GroupWithMorphisms<F>> {
    check_morphism_shape("compute_image", f, domain, codomain)?;
    #[cfg(feature = "verify-morphisms")]
    assert!(
        morphism_well_defined(prime, f, domain, codomain)?,
        "image of a map {domain} -> {codomain} that is not a homomorphism"
    );
    debug!("image at {prime} of a map {domain} -> {codomain}");

    let mut lattice = kernel_lattice(prime, f, codomain)?;
    let mut rewritten_f = f.clone();
    let mut propagator = BasisPropagator::new(
        domain.rank(),
        tracked_lists([&mut lattice], into_domain),
        tracked_lists([&mut rewritten_f], out_of_domain),
    )?;
    let pivots = diagonalize::<Rows, F>(prime, &mut propagator)?;
    drop(propagator);

    let (group, kept) = classify(&pivots, domain.rank())?;
    debug!("image is {group}");
    Ok(GroupWithMorphisms {
        group,
        to_group: ExactMatrix::identity(domain.rank()).select_rows(&kept),
        from_group: rewritten_f.select_columns(&kept),
    })
}

/// `ker(outgoing) / im(incoming)` at `middle`, reducing with row operations on `middle`.
/// `incoming` lands in `middle` and `outgoing` leaves it for `codomain`.
/// `to_group` is only meaningful on cycles.
/// # Errors
/// the shapes of `incoming` or `outgoing` do not fit `middle` and `codomain`,
/// or a tracked matrix does not have `middle.rank()` rows (into) or columns (out of)
pub fn compute_homology<F: PAdicValuation>(
    prime: Prime,
    incoming: &ExactMatrix<F>,
    outgoing: &ExactMatrix<F>,
    middle: &AbelianGroup,
    codomain: &AbelianGroup,
    into_middle: MatrixList<'_, F>,
    out_of_middle: MatrixList<'_, F>,
) -> Result<GroupWithMorphisms<F>> {
    check_dimension("compute_homology", middle.rank(), incoming.height())?;
    check_morphism_shape("compute_homology", outgoing, middle, codomain)?;
    #[cfg(feature = "verify-morphisms")]
    assert!(
        morphism_zero(prime, &outgoing.multiply(incoming)?, codomain)?,
        "consecutive maps through {middle} do not compose to zero"
    );
    debug!("homology at {prime} of {middle}");

    let mut boundaries = incoming.clone();
    let kernel = compute_kernel(
        prime,
        outgoing,
        middle,
        codomain,
        tracked_lists([&mut boundaries], into_middle),
        out_of_middle,
    )?;
    let GroupWithMorphisms {
        group: cycles,
        to_group: mut to_cycles,
        from_group: mut from_cycles,
    } = kernel;
    let boundaries_in_cycles = to_cycles.multiply(&boundaries)?;
    let quotient = compute_cokernel(
        prime,
        &boundaries_in_cycles,
        &cycles,
        vec![&mut to_cycles],
        vec![&mut from_cycles],
    )?;
    debug!("homology is {}", quotient.group);
    Ok(GroupWithMorphisms {
        to_group: quotient.to_group.multiply(&to_cycles)?,
        from_group: from_cycles.multiply(&quotient.from_group)?,
        group: quotient.group,
    })
}
