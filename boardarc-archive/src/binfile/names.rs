//! Descriptive entry names.
//!
//! The container stores no names, so each entry is named after the archive,
//! its index and its compression, then tagged from its decoded content.
//! HSF model files carry per-section counts in their header; a non-zero
//! count marks the section as present.

use boardarc_core::CompressionType;
use std::path::Path;

/// Magic of an HSF model file.
pub const HSF_MAGIC: &[u8; 4] = b"HSFV";

/// Sections present in an HSF model header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HsfSections {
    /// Fog settings.
    pub fog: bool,
    /// Mesh geometry.
    pub mesh: bool,
    /// Object hierarchy.
    pub objects: bool,
    /// Textures.
    pub texture: bool,
    /// Shape morph targets.
    pub morph: bool,
    /// Map attributes (collision).
    pub collision: bool,
    /// Motion data.
    pub motion: bool,
}

impl HsfSections {
    /// Parse the section counts, or `None` if `data` is not an HSF file.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() <= 200 || !data.starts_with(HSF_MAGIC) {
            return None;
        }
        let present = |offset: usize| read_u32_be(data, offset).is_some_and(|n| n > 0);
        Some(Self {
            fog: present(12),
            mesh: present(44),
            objects: present(76),
            texture: present(84),
            morph: present(140),
            collision: present(148),
            motion: present(180),
        })
    }

    /// Name prefix for the most significant section present.
    pub fn prefix(&self) -> &'static str {
        if self.collision {
            "MESH_COLLISION_"
        } else if self.morph {
            "MESH_MORPH_"
        } else if self.mesh {
            "MESH_"
        } else if self.motion {
            "MOTION_"
        } else if self.objects {
            "OBJ_"
        } else if self.texture {
            "TEX_"
        } else if self.fog {
            "FOG_"
        } else {
            ""
        }
    }
}

fn read_u32_be(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Archive file name without directory or extension.
pub fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

/// `"{stem}{index:02}{suffix}"`, e.g. `w0103.lz`.
pub fn base_name(stem: &str, index: usize, compression: CompressionType) -> String {
    format!("{}{:02}{}", stem, index, compression.suffix())
}

/// Full descriptive name for entry `index` holding `data`.
pub fn entry_name(stem: &str, index: usize, compression: CompressionType, data: &[u8]) -> String {
    let base = base_name(stem, index, compression);

    if let Some(sections) = HsfSections::parse(data) {
        return format!("{}{}.hsf", sections.prefix(), base);
    }

    // Animation files keep their first table at offset 20
    if data.len() > 16 && read_u32_be(data, 12) == Some(20) {
        format!("{}.anm", base)
    } else {
        format!("{}.dat", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsf_with(flags: &[usize]) -> Vec<u8> {
        let mut data = vec![0u8; 256];
        data[..4].copy_from_slice(HSF_MAGIC);
        for &offset in flags {
            data[offset..offset + 4].copy_from_slice(&1u32.to_be_bytes());
        }
        data
    }

    #[test]
    fn test_stem() {
        assert_eq!(file_stem("data/w01.bin"), "w01");
        assert_eq!(file_stem("board.dat"), "board");
        assert_eq!(file_stem(""), "");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("w01", 3, CompressionType::Lzss), "w0103.lz");
        assert_eq!(base_name("w01", 12, CompressionType::None), "w0112");
        assert_eq!(base_name("x", 100, CompressionType::FlideAlt), "x100.fsa");
    }

    #[test]
    fn test_hsf_prefix_priority() {
        let cases: [(&[usize], &str); 8] = [
            (&[148, 140, 44], "MESH_COLLISION_"),
            (&[140, 44, 180], "MESH_MORPH_"),
            (&[44, 180, 76], "MESH_"),
            (&[180, 76, 84], "MOTION_"),
            (&[76, 84, 12], "OBJ_"),
            (&[84, 12], "TEX_"),
            (&[12], "FOG_"),
            (&[], ""),
        ];
        for (flags, prefix) in cases {
            let data = hsf_with(flags);
            let name = entry_name("w01", 0, CompressionType::Slide, &data);
            assert_eq!(name, format!("{}w0100.s.hsf", prefix));
        }
    }

    #[test]
    fn test_short_hsf_is_not_model() {
        let mut data = hsf_with(&[44]);
        data.truncate(200);
        assert_eq!(entry_name("a", 1, CompressionType::None, &data), "a01.dat");
    }

    #[test]
    fn test_animation_and_data() {
        let mut data = vec![0u8; 32];
        data[12..16].copy_from_slice(&20u32.to_be_bytes());
        assert_eq!(entry_name("m", 2, CompressionType::Lzss, &data), "m02.lz.anm");

        data[15] = 21;
        assert_eq!(entry_name("m", 2, CompressionType::Lzss, &data), "m02.lz.dat");

        // Too short to inspect
        assert_eq!(entry_name("m", 2, CompressionType::None, &[0; 16]), "m02.dat");
        assert_eq!(entry_name("m", 2, CompressionType::None, &[]), "m02.dat");
    }
}
