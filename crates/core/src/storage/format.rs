use crate::errors::CoreError;

use super::encryption::KdfParams;

/// Magic bytes opening every Asset Hub vault file.
pub const MAGIC: &[u8; 4] = b"AHUB";

pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf(12) + salt(16) + nonce(12) + length(8)
pub const HEADER_SIZE: usize = 54;

/// Parsed vault header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultHeader {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; 16],
    pub nonce: [u8; 12],
}

/// Assemble a vault file.
///
/// ```text
/// [AHUB] [version u16] [memory u32] [time u32] [lanes u32]
/// [salt 16B] [nonce 12B] [ciphertext length u64] [ciphertext]
/// ```
/// All integers little-endian.
pub fn encode(header: &VaultHeader, ciphertext: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&header.version.to_le_bytes());
    out.extend_from_slice(&header.kdf_params.memory_cost.to_le_bytes());
    out.extend_from_slice(&header.kdf_params.time_cost.to_le_bytes());
    out.extend_from_slice(&header.kdf_params.parallelism.to_le_bytes());
    out.extend_from_slice(&header.salt);
    out.extend_from_slice(&header.nonce);
    out.extend_from_slice(&(ciphertext.len() as u64).to_le_bytes());
    out.extend_from_slice(ciphertext);
    out
}

/// Split a vault file into its header and ciphertext.
pub fn decode(data: &[u8]) -> Result<(VaultHeader, &[u8]), CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(format!(
            "File too small for a vault header ({} bytes)",
            data.len()
        )));
    }

    let mut reader = Reader { data, pos: 0 };
    if reader.take::<4>()? != *MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes — not an Asset Hub vault".into(),
        ));
    }

    let version = u16::from_le_bytes(reader.take()?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(reader.take()?),
        time_cost: u32::from_le_bytes(reader.take()?),
        parallelism: u32::from_le_bytes(reader.take()?),
    };
    kdf_params.validate()?;

    let salt = reader.take::<16>()?;
    let nonce = reader.take::<12>()?;
    let len = u64::from_le_bytes(reader.take()?);

    let remaining = reader.rest();
    let len = usize::try_from(len)
        .ok()
        .filter(|l| *l <= remaining.len())
        .ok_or_else(|| {
            CoreError::InvalidFileFormat(format!(
                "File truncated: header announces {len} bytes of ciphertext, {} present",
                remaining.len()
            ))
        })?;

    Ok((
        VaultHeader {
            version,
            kdf_params,
            salt,
            nonce,
        },
        &remaining[..len],
    ))
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let end = self.pos + N;
        let bytes: [u8; N] = self
            .data
            .get(self.pos..end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat("Unexpected end of header".into()))?;
        self.pos = end;
        Ok(bytes)
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}
