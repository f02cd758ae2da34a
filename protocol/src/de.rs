//! Special purpose de-serialization for bridge frames

use super::buffer::{Error, FrameBuffer, Result};
use core::fmt::Display;
use serde::{de, de::IntoDeserializer};

pub struct FrameDeserializer<'d> {
    input: &'d mut FrameBuffer,
}

impl<'a> FrameDeserializer<'a> {
    pub fn new(input: &'a mut FrameBuffer) -> Self {
        FrameDeserializer { input }
    }
}

impl de::Error for Error {
    fn custom<T: Display>(_msg: T) -> Self {
        Error::Deserialize
    }
}

macro_rules! from_le_bytes {
    ($gen_fn:ident, $visit_fn:ident, $num:ty, $len:expr) => {
        fn $gen_fn<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
            let mut bytes = [0u8; $len];
            bytes[..].copy_from_slice(self.input.front_bytes($len)?);
            self.input.pop_front_bytes($len);
            visitor.$visit_fn(<$num>::from_le_bytes(bytes))
        }
    };
}

/// Sequence or map contents, with the element count known up front
struct Counted<'d, 'a> {
    deserializer: &'a mut FrameDeserializer<'d>,
    len: usize,
}

impl<'d, 'a> de::SeqAccess<'d> for Counted<'d, 'a> {
    type Error = Error;

    fn size_hint(&self) -> Option<usize> {
        // Untrusted, so don't let it drive preallocation
        Some(self.len.min(4096))
    }

    fn next_element_seed<S>(&mut self, seed: S) -> Result<Option<S::Value>>
    where
        S: de::DeserializeSeed<'d>,
    {
        if self.len > 0 {
            self.len -= 1;
            Ok(Some(de::DeserializeSeed::deserialize(
                seed,
                &mut *self.deserializer,
            )?))
        } else {
            Ok(None)
        }
    }
}

impl<'d, 'a> de::MapAccess<'d> for Counted<'d, 'a> {
    type Error = Error;

    fn size_hint(&self) -> Option<usize> {
        Some(self.len.min(4096))
    }

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'d>,
    {
        if self.len > 0 {
            self.len -= 1;
            Ok(Some(de::DeserializeSeed::deserialize(
                seed,
                &mut *self.deserializer,
            )?))
        } else {
            Ok(None)
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'d>,
    {
        de::DeserializeSeed::deserialize(seed, &mut *self.deserializer)
    }
}

impl<'d> FrameDeserializer<'d> {
    fn read_byte_buf(&mut self) -> Result<Vec<u8>> {
        let len = self.input.pop_front_len()?;
        self.input.pop_front_vec(len)
    }
}

impl<'d, 'a> de::Deserializer<'d> for &'a mut FrameDeserializer<'d> {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V: de::Visitor<'d>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unimplemented)
    }

    fn deserialize_identifier<V: de::Visitor<'d>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unimplemented)
    }

    fn deserialize_ignored_any<V: de::Visitor<'d>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unimplemented)
    }

    fn deserialize_byte_buf<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_byte_buf(self.read_byte_buf()?)
    }

    fn deserialize_bytes<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_str<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        let bytes = self.read_byte_buf()?;
        match String::from_utf8(bytes) {
            Ok(s) => visitor.visit_string(s),
            Err(_) => Err(Error::InvalidUtf8),
        }
    }

    fn deserialize_char<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.input.front_bytes(4)?);
        self.input.pop_front_bytes(4);
        match core::char::from_u32(u32::from_le_bytes(bytes)) {
            Some(c) => visitor.visit_char(c),
            None => Err(Error::InvalidValue),
        }
    }

    from_le_bytes!(deserialize_u16, visit_u16, u16, 2);
    from_le_bytes!(deserialize_i16, visit_i16, i16, 2);
    from_le_bytes!(deserialize_u32, visit_u32, u32, 4);
    from_le_bytes!(deserialize_i32, visit_i32, i32, 4);
    from_le_bytes!(deserialize_u64, visit_u64, u64, 8);
    from_le_bytes!(deserialize_i64, visit_i64, i64, 8);
    from_le_bytes!(deserialize_f32, visit_f32, f32, 4);
    from_le_bytes!(deserialize_f64, visit_f64, f64, 8);

    fn deserialize_u8<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.input.pop_front_byte()?)
    }

    fn deserialize_i8<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.input.pop_front_byte()? as i8)
    }

    fn deserialize_bool<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        match self.input.pop_front_byte()? {
            0 => visitor.visit_bool(false),
            1 => visitor.visit_bool(true),
            _ => Err(Error::InvalidValue),
        }
    }

    fn deserialize_option<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        match self.input.pop_front_byte()? {
            0 => visitor.visit_none(),
            1 => visitor.visit_some(self),
            _ => Err(Error::InvalidValue),
        }
    }

    fn deserialize_unit<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: de::Visitor<'d>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_seq<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        let len = self.input.pop_front_len()?;
        visitor.visit_seq(Counted {
            deserializer: self,
            len,
        })
    }

    fn deserialize_map<V: de::Visitor<'d>>(self, visitor: V) -> Result<V::Value> {
        let len = self.input.pop_front_len()?;
        visitor.visit_map(Counted {
            deserializer: self,
            len,
        })
    }

    fn deserialize_tuple<V: de::Visitor<'d>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(Counted {
            deserializer: self,
            len,
        })
    }

    fn deserialize_tuple_struct<V: de::Visitor<'d>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_enum<V: de::Visitor<'d>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(self)
    }

    fn deserialize_newtype_struct<V: de::Visitor<'d>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: de::Visitor<'d>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_tuple(fields.len(), visitor)
    }
}

impl<'d, 'a> de::VariantAccess<'d> for &'a mut FrameDeserializer<'d> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<V: de::DeserializeSeed<'d>>(self, seed: V) -> Result<V::Value> {
        de::DeserializeSeed::deserialize(seed, self)
    }

    fn tuple_variant<V: de::Visitor<'d>>(self, len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_tuple(self, len, visitor)
    }

    fn struct_variant<V: de::Visitor<'d>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_tuple(self, fields.len(), visitor)
    }
}

impl<'d, 'a> de::EnumAccess<'d> for &'a mut FrameDeserializer<'d> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: de::DeserializeSeed<'d>>(self, seed: V) -> Result<(V::Value, Self)> {
        let variant_index = self.input.pop_front_byte()?;
        let variant: de::value::U32Deserializer<Error> = (variant_index as u32).into_deserializer();
        let v = de::DeserializeSeed::deserialize(seed, variant)?;
        Ok((v, self))
    }
}
