//! Builtin payload families, one module per execution strategy.

pub mod library;
pub mod loops;
pub mod naive;
pub mod vectorized;

use crate::registry::{Registry, RegistryError};

/// Assemble every builtin family in report order: vectorized, library, loops, naive.
pub fn builtin() -> Result<Registry, RegistryError> {
    Ok(Registry::builder()
        .register(vectorized::family())?
        .register(library::family())?
        .register(loops::family())?
        .register(naive::family())?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::task;
    use crate::frame::{Frame, InputKind};
    use crate::registry::Filter;
    use crate::sample::SampleSpec;

    #[test]
    fn test_builtin_assembles_with_unique_slugs() {
        let reg = builtin().unwrap();
        assert!(reg.len() >= 15);
        assert_eq!(reg.descriptors()[0].slug, "ndarray-invert");
    }

    #[test]
    fn test_default_filter_skips_naive() {
        let reg = builtin().unwrap();
        let picked = reg.filter(&Filter::default());
        assert!(picked.iter().all(|d| !d.slug.starts_with("naive-")));
        let with_slow = reg.filter(&Filter {
            include_slow: true,
            ..Default::default()
        });
        assert_eq!(with_slow.len(), reg.len());
    }

    #[test]
    fn test_families_keep_declaration_order_within_task() {
        let reg = builtin().unwrap();
        let invert: Vec<&str> = reg
            .filter(&Filter {
                task: Some(task::INVERT.into()),
                include_slow: true,
                ..Default::default()
            })
            .iter()
            .map(|d| d.slug)
            .collect();
        assert_eq!(
            invert,
            [
                "ndarray-invert",
                "ndarray-absdiff",
                "image-invert",
                "loop-invert",
                "naive-invert"
            ]
        );
    }

    #[test]
    fn test_every_builtin_runs_on_a_sample() {
        let img = image::DynamicImage::ImageRgb8(
            SampleSpec {
                width: 12,
                height: 8,
                seed: 3,
            }
            .generate(),
        );
        let reg = builtin().unwrap();
        for d in reg.descriptors() {
            let frame = Frame::from_dynamic(img.clone(), d.representation())
                .unwrap()
                .prepare(d.input);
            let out = d
                .transform
                .apply(frame)
                .unwrap_or_else(|e| panic!("{} failed: {e}", d.slug));
            assert_eq!(out.representation(), d.representation(), "{}", d.slug);
            let grayscale_out = matches!(d.task, "grayscale" | "edge_detect_sobel" | "lee_filter");
            assert_eq!(out.is_color(), !grayscale_out, "{}", d.slug);
            if d.input == InputKind::Grayscale {
                assert!(!out.is_color(), "{}", d.slug);
            }
        }
    }
}
