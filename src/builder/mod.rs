pub mod qr;

pub use qr::{Module, QR};

use crate::common::codec;
use crate::common::error::{QRError, QRResult};
use crate::common::mask::{find_best_mask, mask_trial, MaskPattern};
use crate::common::metadata::{Version, MAX_VERSION, MIN_VERSION};

pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        let version = match self.version {
            Some(v) => v.number().to_string(),
            None => "None".to_string(),
        };
        let mask = match self.mask {
            Some(m) => (*m).to_string(),
            None => "None".to_string(),
        };
        format!("{{ Version: {version}, Mask: {mask} }}")
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        println!("\nGenerating QR {}...", self.metadata());

        let version = match self.version {
            Some(v) => v,
            None => {
                println!("Finding smallest fitting version...");
                Self::fit_version(self.data.len())?
            }
        };

        println!("Encoding data...");
        let bits = codec::encode(self.data, version);

        println!("Drawing function patterns...");
        let mut skeleton = QR::new(version);
        skeleton.draw_function_patterns();

        let (qr, mask) = match self.mask {
            Some(m) => {
                println!("Applying mask {}...", *m);
                (mask_trial(&skeleton, &bits, m), m)
            }
            None => {
                println!("Finding & applying best mask...");
                find_best_mask(&skeleton, &bits)
            }
        };

        println!("\x1b[1;32mQR generated successfully!\n\x1b[0m");

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();

        println!("Report:");
        println!("{{ Version: {}, Mask: {} }}", version.number(), *mask);
        println!(
            "Data capacity: {} bytes, Payload: {} bytes",
            version.max_payload_len(),
            self.data.len().min(version.max_payload_len())
        );
        println!(
            "Dark Cells: {}, Light Cells: {}, Balance: {}\n",
            dark_modules,
            total_modules - dark_modules,
            dark_modules * 100 / total_modules
        );

        Ok(qr)
    }

    /// Smallest version whose payload capacity covers `len` bytes.
    fn fit_version(len: usize) -> QRResult<Version> {
        (MIN_VERSION..=MAX_VERSION)
            .map(Version::new)
            .filter_map(Result::ok)
            .find(|v| v.max_payload_len() >= len)
            .ok_or(QRError::DataTooLong)
    }
}
