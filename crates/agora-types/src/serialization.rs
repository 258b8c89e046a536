//! Serialization implementations for agora-types.
//!
//! MemberId serializes as its display string under serde and as raw bytes
//! under borsh; bounded text re-validates its limit on deserialization.

use crate::*;

mod serde_impls {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for MemberId {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            self.to_string().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for MemberId {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            MemberId::from_str(&s).map_err(serde::de::Error::custom)
        }
    }

    impl<const MAX: usize> Serialize for BoundedText<MAX> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            self.as_str().serialize(serializer)
        }
    }

    impl<'de, const MAX: usize> Deserialize<'de> for BoundedText<MAX> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            BoundedText::new(s).map_err(serde::de::Error::custom)
        }
    }
}

mod borsh_impls {
    use super::*;
    use borsh::io::{Error, ErrorKind, Read, Result, Write};
    use borsh::{BorshDeserialize, BorshSerialize};

    impl BorshSerialize for MemberId {
        fn serialize<W: Write>(&self, writer: &mut W) -> Result<()> {
            writer.write_all(self.as_bytes())
        }
    }

    impl BorshDeserialize for MemberId {
        fn deserialize_reader<R: Read>(reader: &mut R) -> Result<Self> {
            let mut bytes = [0u8; MemberId::LEN];
            reader.read_exact(&mut bytes)?;
            Ok(MemberId::from_bytes(bytes))
        }
    }

    impl<const MAX: usize> BorshSerialize for BoundedText<MAX> {
        fn serialize<W: Write>(&self, writer: &mut W) -> Result<()> {
            self.as_str().serialize(writer)
        }
    }

    impl<const MAX: usize> BorshDeserialize for BoundedText<MAX> {
        fn deserialize_reader<R: Read>(reader: &mut R) -> Result<Self> {
            let s = String::deserialize_reader(reader)?;
            BoundedText::new(s).map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))
        }
    }
}
