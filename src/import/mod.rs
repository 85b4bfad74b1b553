mod dates;
mod detect;
mod fields;
mod generic;
mod normalize;
mod numeric;
mod reader;
mod wizard;

pub(crate) use dates::month_key;
pub(crate) use detect::{detect_format, SourceFormat};
pub(crate) use fields::Field;
pub(crate) use generic::{import_generic, import_izvoz, IZVOZ_TARGET_YEAR};
pub(crate) use numeric::NumberFormat;
pub(crate) use reader::CsvImporter;
pub(crate) use wizard::{ImportWizard, WizardStep};
