//! Product form validation.
//!
//! Every rule runs independently and all violations are reported together.
//! The category set is an explicit argument: the caller passes whatever the
//! category resolver returned for this request.

use serde::{Deserialize, Serialize};
use url::Url;

use storefront_core::{FieldErrors, FieldWarning, ProductId, ValidationResult};

use crate::category::CategoryMap;
use crate::price::Price;

/// Form field names, shared with the remote error mapping.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const PRICE: &str = "price";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const IMAGE: &str = "image";
    pub const PRODUCT_ID: &str = "product_id";
}

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MIN_CHARS: usize = 10;

const REQUIRED: &str = "This field is required.";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "avif", "bmp"];

const IMAGE_HOSTS: &[&str] = &[
    "i.imgur.com",
    "imgur.com",
    "placeimg.com",
    "picsum.photos",
    "images.unsplash.com",
    "cdn.pixabay.com",
    "res.cloudinary.com",
    "i.ibb.co",
];

/// Product form exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProductForm {
    pub title: String,
    pub price: String,
    pub description: String,
    /// Category name or numeric id.
    pub category: String,
    pub image: String,
}

/// A product form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub title: String,
    pub price: Price,
    pub description: String,
    pub category_ref: String,
    pub image_url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProduct {
    pub input: ProductInput,
    pub warnings: Vec<FieldWarning>,
}

/// Validate a submitted product form against the available categories.
pub fn validate(form: &RawProductForm, categories: &CategoryMap) -> ValidationResult<ValidatedProduct> {
    let mut errors = FieldErrors::new();
    let mut warnings = Vec::new();

    let title = form.title.trim();
    check_length(&mut errors, fields::TITLE, title, TITLE_MIN_CHARS, Some(TITLE_MAX_CHARS));

    let price = match form.price.parse::<Price>() {
        Ok(price) => Some(price),
        Err(e) => {
            errors.add(fields::PRICE, e.message());
            None
        }
    };

    let description = form.description.trim();
    check_length(&mut errors, fields::DESCRIPTION, description, DESCRIPTION_MIN_CHARS, None);

    let category_ref = form.category.trim();
    if !categories.is_empty() {
        if category_ref.is_empty() {
            errors.add(fields::CATEGORY, REQUIRED);
        } else if categories.find_ref(category_ref).is_none() {
            errors.add(
                fields::CATEGORY,
                format!("Select a valid choice. {category_ref} is not one of the available choices."),
            );
        }
    }

    let image_url = match parse_image_url(&form.image) {
        Ok(url) => {
            if !looks_like_image(&url) {
                warnings.push(FieldWarning::new(
                    fields::IMAGE,
                    "The URL does not look like an image; it will be submitted anyway.",
                ));
            }
            Some(url)
        }
        Err(message) => {
            errors.add(fields::IMAGE, message);
            None
        }
    };

    match (price, image_url) {
        (Some(price), Some(image_url)) if errors.is_empty() => Ok(ValidatedProduct {
            input: ProductInput {
                title: title.to_string(),
                price,
                description: description.to_string(),
                category_ref: category_ref.to_string(),
                image_url,
            },
            warnings,
        }),
        _ => Err(errors),
    }
}

/// Validate the id typed into the product search form.
pub fn parse_product_id(raw: &str) -> ValidationResult<ProductId> {
    if raw.trim().is_empty() {
        return Err(FieldErrors::single(fields::PRODUCT_ID, REQUIRED));
    }
    raw.parse::<ProductId>()
        .map_err(|_| FieldErrors::single(fields::PRODUCT_ID, "Enter a whole number greater than zero."))
}

fn check_length(errors: &mut FieldErrors, field: &str, value: &str, min: usize, max: Option<usize>) {
    let len = value.chars().count();
    if len == 0 {
        errors.add(field, REQUIRED);
    } else if len < min {
        errors.add(
            field,
            format!("Ensure this value has at least {min} characters (it has {len})."),
        );
    } else if let Some(max) = max.filter(|max| len > *max) {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {len})."),
        );
    }
}

fn parse_image_url(raw: &str) -> Result<Url, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(REQUIRED);
    }
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => Ok(url),
        _ => Err("Enter a valid URL."),
    }
}

/// Best-effort hint: a known image extension or a known image host.
pub fn looks_like_image(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    let has_image_extension = path
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext));

    let on_image_host = url.host_str().is_some_and(|host| {
        IMAGE_HOSTS
            .iter()
            .any(|known| host == *known || host.ends_with(&format!(".{known}")))
    });

    has_image_extension || on_image_host
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn categories() -> CategoryMap {
        CategoryMap::new([Category::new(2, "electronics"), Category::new(3, "jewelery")])
    }

    fn valid_form() -> RawProductForm {
        RawProductForm {
            title: "Mechanical keyboard".to_string(),
            price: "89.90".to_string(),
            description: "Tenkeyless board with brown switches.".to_string(),
            category: "electronics".to_string(),
            image: "https://i.imgur.com/keyboard.png".to_string(),
        }
    }

    #[test]
    fn accepts_valid_form_and_trims_text() {
        let mut form = valid_form();
        form.title = "  Mechanical keyboard  ".to_string();

        let validated = validate(&form, &categories()).unwrap();
        assert_eq!(validated.input.title, "Mechanical keyboard");
        assert_eq!(validated.input.price.cents(), 8990);
        assert_eq!(validated.input.category_ref, "electronics");
        assert!(validated.warnings.is_empty());
    }

    #[test]
    fn collects_every_violation() {
        let form = RawProductForm {
            title: "ab".to_string(),
            price: "-1".to_string(),
            description: "short".to_string(),
            category: "furniture".to_string(),
            image: "not a url".to_string(),
        };

        let errors = validate(&form, &categories()).unwrap_err();
        for field in [fields::TITLE, fields::PRICE, fields::DESCRIPTION, fields::CATEGORY, fields::IMAGE] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert_eq!(errors.get(fields::TITLE), ["Ensure this value has at least 3 characters (it has 2)."]);
    }

    #[test]
    fn empty_form_reports_required_fields() {
        let errors = validate(&RawProductForm::default(), &categories()).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.messages().all(|m| m == REQUIRED));
    }

    #[test]
    fn title_longer_than_limit_is_rejected() {
        let mut form = valid_form();
        form.title = "x".repeat(101);
        let errors = validate(&form, &categories()).unwrap_err();
        assert_eq!(errors.get(fields::TITLE), ["Ensure this value has at most 100 characters (it has 101)."]);

        form.title = "é".repeat(100);
        assert!(validate(&form, &categories()).is_ok());
    }

    #[test]
    fn category_accepts_numeric_id() {
        let mut form = valid_form();
        form.category = "3".to_string();
        assert!(validate(&form, &categories()).is_ok());
    }

    #[test]
    fn category_is_optional_when_categories_unavailable() {
        let mut form = valid_form();
        form.category = String::new();
        let validated = validate(&form, &CategoryMap::empty()).unwrap();
        assert_eq!(validated.input.category_ref, "");

        form.category = "anything".to_string();
        assert!(validate(&form, &CategoryMap::empty()).is_ok());
    }

    #[test]
    fn non_image_url_only_warns() {
        let mut form = valid_form();
        form.image = "https://example.com/products/42".to_string();

        let validated = validate(&form, &categories()).unwrap();
        assert_eq!(validated.warnings.len(), 1);
        assert_eq!(validated.warnings[0].field, fields::IMAGE);
    }

    #[test]
    fn image_hints() {
        let url = |s: &str| Url::parse(s).unwrap();
        assert!(looks_like_image(&url("https://example.com/a/b/photo.JPEG")));
        assert!(looks_like_image(&url("https://picsum.photos/640/480")));
        assert!(looks_like_image(&url("https://eu.res.cloudinary.com/demo/upload/sample")));
        assert!(!looks_like_image(&url("https://example.com/gallery")));
        assert!(!looks_like_image(&url("https://notimgur.com/abc")));
    }

    #[test]
    fn image_must_be_http_url() {
        let mut form = valid_form();
        form.image = "ftp://files.example.com/a.png".to_string();
        let errors = validate(&form, &categories()).unwrap_err();
        assert_eq!(errors.get(fields::IMAGE), ["Enter a valid URL."]);
    }

    #[test]
    fn product_id_search_input() {
        assert_eq!(parse_product_id(" 12 "), Ok(ProductId::new(12)));
        assert_eq!(parse_product_id("").unwrap_err().get(fields::PRODUCT_ID), [REQUIRED]);
        assert!(parse_product_id("twelve").unwrap_err().contains(fields::PRODUCT_ID));
        assert!(parse_product_id("0").is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: any title shorter than 3 characters is rejected on the title field.
            #[test]
            fn short_titles_are_rejected(title in "[A-Za-z0-9]{0,2}") {
                let mut form = valid_form();
                form.title = title;
                let errors = validate(&form, &categories()).unwrap_err();
                prop_assert!(errors.contains(fields::TITLE));
                prop_assert_eq!(errors.len(), 1);
            }

            /// Property: well-formed inputs always validate and keep their price.
            #[test]
            fn well_formed_inputs_validate(
                title in "[A-Za-z][A-Za-z0-9 ]{2,98}[A-Za-z]",
                whole in 0u64..1_000_000,
                cents in 1u64..100,
                description in "[A-Za-z]{10}[A-Za-z ]{0,190}",
            ) {
                let form = RawProductForm {
                    title,
                    price: format!("{whole}.{cents:02}"),
                    description: format!("{description}."),
                    category: "jewelery".to_string(),
                    image: "https://picsum.photos/200".to_string(),
                };
                let validated = validate(&form, &categories()).unwrap();
                prop_assert_eq!(validated.input.price.cents(), whole * 100 + cents);
            }
        }
    }
}
