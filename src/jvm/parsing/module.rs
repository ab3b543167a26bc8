use crate::jvm::module::{Export, ExportFlags, Flags, Module, Open, OpenFlags, Provide, Require, RequireFlags};

use super::{reader::FromReader, ByteReader, ClassElement, Context, Error};

struct RawRequire {
    index: u16,
    flags: u16,
    version_index: u16,
}

impl FromReader for RawRequire {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            index: reader.u2()?,
            flags: reader.u2()?,
            version_index: reader.u2()?,
        })
    }
}

struct RawExport {
    index: u16,
    flags: u16,
    to_indices: Vec<u16>,
}

impl FromReader for RawExport {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let index = reader.u2()?;
        let flags = reader.u2()?;
        let count = reader.u2()? as usize;
        Ok(Self {
            index,
            flags,
            to_indices: reader.many(count)?,
        })
    }
}

struct RawOpen {
    index: u16,
    flags: u16,
    to_indices: Vec<u16>,
}

impl FromReader for RawOpen {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let index = reader.u2()?;
        let flags = reader.u2()?;
        let count = reader.u2()? as usize;
        Ok(Self {
            index,
            flags,
            to_indices: reader.many(count)?,
        })
    }
}

struct RawProvide {
    index: u16,
    with_indices: Vec<u16>,
}

impl FromReader for RawProvide {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let index = reader.u2()?;
        let count = reader.u2()? as usize;
        Ok(Self {
            index,
            with_indices: reader.many(count)?,
        })
    }
}

pub(crate) struct RawModule {
    name_index: u16,
    flags: u16,
    version_index: u16,
    requires: Vec<RawRequire>,
    exports: Vec<RawExport>,
    opens: Vec<RawOpen>,
    uses_indices: Vec<u16>,
    provides: Vec<RawProvide>,
}

impl FromReader for RawModule {
    fn from_reader(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let name_index = reader.u2()?;
        let flags = reader.u2()?;
        let version_index = reader.u2()?;

        let requires_count = reader.u2()? as usize;
        let requires = reader.many(requires_count)?;

        let exports_count = reader.u2()? as usize;
        let exports = reader.many(exports_count)?;

        let opens_count = reader.u2()? as usize;
        let opens = reader.many(opens_count)?;

        let uses_count = reader.u2()? as usize;
        let uses_indices = reader.many(uses_count)?;

        let provides_count = reader.u2()? as usize;
        let provides = reader.many(provides_count)?;

        Ok(Self {
            name_index,
            flags,
            version_index,
            requires,
            exports,
            opens,
            uses_indices,
            provides,
        })
    }
}

impl ClassElement for Module {
    type Raw = RawModule;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        let cp = ctx.constant_pool;
        let requires = raw
            .requires
            .into_iter()
            .map(|r| {
                Ok(Require {
                    module: cp.get_module_ref(r.index)?,
                    flags: RequireFlags::from_bits_truncate(r.flags),
                    version: (r.version_index != 0)
                        .then(|| cp.get_str(r.version_index))
                        .transpose()?
                        .map(str::to_owned),
                })
            })
            .collect::<Result<_, Error>>()?;
        let exports = raw
            .exports
            .into_iter()
            .map(|e| {
                Ok(Export {
                    package: cp.get_package_ref(e.index)?,
                    flags: ExportFlags::from_bits_truncate(e.flags),
                    to: e
                        .to_indices
                        .into_iter()
                        .map(|idx| cp.get_module_ref(idx))
                        .collect::<Result<_, Error>>()?,
                })
            })
            .collect::<Result<_, Error>>()?;
        let opens = raw
            .opens
            .into_iter()
            .map(|o| {
                Ok(Open {
                    package: cp.get_package_ref(o.index)?,
                    flags: OpenFlags::from_bits_truncate(o.flags),
                    to: o
                        .to_indices
                        .into_iter()
                        .map(|idx| cp.get_module_ref(idx))
                        .collect::<Result<_, Error>>()?,
                })
            })
            .collect::<Result<_, Error>>()?;
        let uses = raw
            .uses_indices
            .into_iter()
            .map(|idx| cp.get_class_ref(idx))
            .collect::<Result<_, Error>>()?;
        let provides = raw
            .provides
            .into_iter()
            .map(|p| {
                Ok(Provide {
                    service: cp.get_class_ref(p.index)?,
                    with: p
                        .with_indices
                        .into_iter()
                        .map(|idx| cp.get_class_ref(idx))
                        .collect::<Result<_, Error>>()?,
                })
            })
            .collect::<Result<_, Error>>()?;

        Ok(Self {
            name: cp.get_module_ref(raw.name_index)?.name,
            flags: Flags::from_bits_truncate(raw.flags),
            version: (raw.version_index != 0)
                .then(|| cp.get_str(raw.version_index))
                .transpose()?
                .map(str::to_owned),
            requires,
            exports,
            opens,
            uses,
            provides,
        })
    }
}
