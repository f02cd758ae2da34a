//! Special purpose serialization for bridge frames
//!
//! The format is positional: structs are their fields in order, enums are a
//! one byte variant index followed by the variant's contents, and anything
//! variable sized carries a u32 length prefix.

use super::buffer::{Error, FrameBuffer, Result};
use core::fmt::Display;
use serde::ser;

pub struct FrameSerializer<'a> {
    output: &'a mut FrameBuffer,
}

impl<'a> FrameSerializer<'a> {
    pub fn new(output: &'a mut FrameBuffer) -> Self {
        FrameSerializer { output }
    }
}

impl ser::StdError for Error {}

impl ser::Error for Error {
    fn custom<T: Display>(_msg: T) -> Self {
        Error::Serialize
    }
}

macro_rules! to_le_bytes {
    ($gen_fn:ident, $num:ty ) => {
        fn $gen_fn(self, v: $num) -> Result<()> {
            self.output.extend_bytes(&v.to_le_bytes())
        }
    };
}

impl<'a, 'b> ser::Serializer for &'b mut FrameSerializer<'a> {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.output.push_back_byte(v as u8)
    }

    to_le_bytes!(serialize_u16, u16);
    to_le_bytes!(serialize_i16, i16);
    to_le_bytes!(serialize_u32, u32);
    to_le_bytes!(serialize_i32, i32);
    to_le_bytes!(serialize_u64, u64);
    to_le_bytes!(serialize_i64, i64);
    to_le_bytes!(serialize_f32, f32);
    to_le_bytes!(serialize_f64, f64);

    fn serialize_none(self) -> Result<()> {
        self.output.push_back_byte(0)
    }

    fn serialize_some<T: ?Sized + ser::Serialize>(self, v: &T) -> Result<()> {
        self.output.push_back_byte(1)?;
        v.serialize(self)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.output.push_back_byte(v as u8)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.output.push_back_byte(v)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _var: &'static str,
    ) -> Result<()> {
        if variant_index < 0x100 {
            self.output.push_back_byte(variant_index as u8)
        } else {
            Err(Error::InvalidValue)
        }
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.serialize_u32(v as u32)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.serialize_bytes(v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.output.push_back_len(v.len())?;
        self.output.extend_bytes(v)
    }

    fn serialize_newtype_struct<T>(self, _: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        self.serialize_unit_variant(name, variant_index, variant)?;
        value.serialize(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self> {
        match len {
            Some(len) => {
                self.output.push_back_len(len)?;
                Ok(self)
            }
            None => Err(Error::Unimplemented),
        }
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self> {
        self.serialize_seq(len)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self> {
        self.serialize_unit_variant(name, variant_index, variant)?;
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self> {
        self.serialize_unit_variant(name, variant_index, variant)?;
        Ok(self)
    }
}

impl<'a, 'b> ser::SerializeSeq for &'b mut FrameSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + ser::Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, 'b> ser::SerializeTuple for &'b mut FrameSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + ser::Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, 'b> ser::SerializeTupleStruct for &'b mut FrameSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + ser::Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, 'b> ser::SerializeTupleVariant for &'b mut FrameSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + ser::Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, 'b> ser::SerializeMap for &'b mut FrameSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + ser::Serialize>(&mut self, key: &T) -> Result<()> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: ?Sized + ser::Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, 'b> ser::SerializeStruct for &'b mut FrameSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, 'b> ser::SerializeStructVariant for &'b mut FrameSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}
