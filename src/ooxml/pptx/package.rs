/// Package implementation for PowerPoint presentations.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::part::{Part, XmlPart};
use crate::ooxml::opc::{OpcPackage, PackURI};
use crate::ooxml::pptx::copy::{self, PartImporter};
use crate::ooxml::pptx::layout::{SlideLayout, SlideMaster};
use crate::ooxml::pptx::parts::presentation::{append_slide_id, remove_slide_id};
use crate::ooxml::pptx::parts::{PresentationPart, SlideId};
use crate::ooxml::pptx::slide::Slide;
use std::io::{Read, Seek};
use std::path::Path;

/// Template for the partnames of new slides.
const SLIDE_PARTNAME_TEMPLATE: &str = "/ppt/slides/slide%d.xml";

/// A PowerPoint (.pptx) package.
///
/// This is the main entry point for working with PowerPoint presentations.
/// It wraps an OPC package and provides the slide-level operations: reading
/// slides, masters and layouts, adding slides from a layout, duplicating,
/// importing and removing slides.
///
/// # Examples
///
/// ```rust,no_run
/// use slidewright::ooxml::pptx::Package;
///
/// let mut pkg = Package::open("presentation.pptx")?;
/// println!("Presentation has {} slides", pkg.slide_count()?);
///
/// let copy = pkg.duplicate_slide(0)?;
/// println!("Duplicated into {}", copy.partname());
/// pkg.save("presentation-copy.pptx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Package {
    /// The underlying OPC package
    opc: OpcPackage,
    /// Partname of `/ppt/presentation.xml`
    main_partname: PackURI,
}

impl Package {
    /// Open a .pptx package from a file path.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use slidewright::ooxml::pptx::Package;
    ///
    /// let pkg = Package::open("presentation.pptx")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_opc(OpcPackage::open(path)?)
    }

    /// Create a .pptx package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_opc(OpcPackage::from_reader(reader)?)
    }

    /// Create a .pptx package from the bytes of an archive.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_opc(OpcPackage::from_bytes(data)?)
    }

    /// Wrap an OPC package, verifying that its main part is a presentation.
    pub fn from_opc(opc: OpcPackage) -> Result<Self> {
        let main_partname = opc
            .main_document_partname()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;

        let content_type = opc.part(&main_partname)?.content_type();
        // Regular, macro-enabled and template presentations share one schema
        if content_type != ct::PML_PRESENTATION_MAIN
            && content_type != ct::PML_PRES_MACRO_MAIN
            && content_type != ct::PML_TEMPLATE_MAIN
        {
            return Err(OoxmlError::InvalidContentType {
                expected: format!(
                    "{}, {} or {}",
                    ct::PML_PRESENTATION_MAIN,
                    ct::PML_PRES_MACRO_MAIN,
                    ct::PML_TEMPLATE_MAIN
                ),
                got: content_type.to_string(),
            });
        }

        Ok(Self { opc, main_partname })
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.opc.save(path.as_ref())?;
        log::info!("saved {}", path.as_ref().display());
        Ok(())
    }

    /// Serialize the package to the bytes of an archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.opc.to_bytes()?)
    }

    /// Get the underlying OPC package.
    ///
    /// This provides access to lower-level package operations.
    #[inline]
    pub fn opc_package(&self) -> &OpcPackage {
        &self.opc
    }

    fn presentation_part(&self) -> Result<PresentationPart<'_>> {
        Ok(PresentationPart::from_part(self.opc.part(&self.main_partname)?))
    }

    /// Slide width and height in EMUs.
    pub fn slide_size(&self) -> Result<Option<(i64, i64)>> {
        self.presentation_part()?.slide_size()
    }

    /// Entries of the slide list, in presentation order.
    pub fn slide_ids(&self) -> Result<Vec<SlideId>> {
        self.presentation_part()?.slide_ids()
    }

    pub fn slide_count(&self) -> Result<usize> {
        Ok(self.slide_ids()?.len())
    }

    /// Partname of the `index`-th slide.
    pub fn slide_partname(&self, index: usize) -> Result<PackURI> {
        let ids = self.slide_ids()?;
        let count = ids.len();
        let entry = ids
            .get(index)
            .ok_or(OoxmlError::SlideIndexOutOfRange { index, count })?;
        Ok(self.opc.part(&self.main_partname)?.target_partname(&entry.r_id)?)
    }

    /// Load the `index`-th slide.
    pub fn slide(&self, index: usize) -> Result<Slide> {
        let partname = self.slide_partname(index)?;
        Slide::from_part(self.opc.part(&partname)?)
    }

    /// Load every slide, in presentation order.
    pub fn slides(&self) -> Result<Vec<Slide>> {
        (0..self.slide_count()?).map(|index| self.slide(index)).collect()
    }

    /// Write an edited slide back into its part.
    pub fn store_slide(&mut self, slide: &Slide) -> Result<()> {
        self.opc
            .part_mut(slide.partname())?
            .set_blob(slide.to_bytes());
        Ok(())
    }

    /// Slide masters, in `p:sldMasterIdLst` order.
    pub fn masters(&self) -> Result<Vec<SlideMaster>> {
        let main = self.opc.part(&self.main_partname)?;
        PresentationPart::from_part(main)
            .slide_master_rids()?
            .iter()
            .map(|r_id| {
                let partname = main.target_partname(r_id)?;
                SlideMaster::from_part(self.opc.part(&partname)?)
            })
            .collect()
    }

    /// Layouts of the first slide master, in order.
    pub fn layouts(&self) -> Result<Vec<SlideLayout>> {
        let Some(master) = self.masters()?.into_iter().next() else {
            return Ok(Vec::new());
        };
        master
            .layout_partnames()
            .iter()
            .map(|partname| self.layout_at(partname))
            .collect()
    }

    /// Load the layout stored at `partname`.
    pub fn layout_at(&self, partname: &PackURI) -> Result<SlideLayout> {
        SlideLayout::from_part(self.opc.part(partname)?)
    }

    /// The `index`-th layout of the first slide master.
    pub fn layout(&self, index: usize) -> Result<SlideLayout> {
        let mut layouts = self.layouts()?;
        let count = layouts.len();
        if index >= count {
            return Err(OoxmlError::LayoutIndexOutOfRange {
                index: isize::try_from(index).unwrap_or(isize::MAX),
                count,
            });
        }
        Ok(layouts.swap_remove(index))
    }

    /// Position of layout `index` of the first slide master, where `-1` is
    /// the last layout.
    pub fn layout_position(&self, index: isize) -> Result<usize> {
        resolve_layout_position(index, self.layouts()?.len())
    }

    /// The layout a slide is based on.
    pub fn slide_layout(&self, slide: &Slide) -> Result<SlideLayout> {
        let partname = slide.layout_partname().ok_or_else(|| {
            OoxmlError::InvalidFormat(format!("{} has no slide layout", slide.partname()))
        })?;
        SlideLayout::from_part(self.opc.part(partname)?)
    }

    /// The master a layout belongs to.
    pub fn layout_master(&self, layout: &SlideLayout) -> Result<SlideMaster> {
        let partname = self
            .opc
            .part(layout.partname())?
            .rels()
            .part_with_reltype(rt::SLIDE_MASTER)?
            .target_partname()?;
        SlideMaster::from_part(self.opc.part(&partname)?)
    }

    /// Append a new slide based on `layout`.
    ///
    /// The slide starts with a copy of each layout placeholder except date,
    /// footer and slide number, and is stored in the package already.
    pub fn add_slide(&mut self, layout: &SlideLayout) -> Result<Slide> {
        let partname = self.opc.next_partname(SLIDE_PARTNAME_TEMPLATE)?;
        let mut slide = Slide::new(partname.clone(), layout.partname().clone());
        for (format, ph) in layout.cloneable_placeholders() {
            slide.add_placeholder(format, ph)?;
        }

        let mut part = XmlPart::from_document(partname.clone(), ct::PML_SLIDE, slide.document());
        part.relate_to(layout.partname(), rt::SLIDE_LAYOUT);
        self.opc.add_part(Box::new(part));

        let main = self.opc.part_mut(&self.main_partname)?;
        let r_id = main.relate_to(&partname, rt::SLIDE);
        let mut doc = main.xml()?;
        let id = append_slide_id(&mut doc, &r_id);
        main.set_xml(&doc);

        log::debug!("added slide {} (id {}) from layout '{}'", partname, id, layout.name());
        Ok(slide)
    }

    /// Append a copy of the `index`-th slide, on the same layout, and return
    /// it. The copy has exactly the source slide's shapes.
    pub fn duplicate_slide(&mut self, index: usize) -> Result<Slide> {
        let source = self.slide(index)?;
        let layout = self.slide_layout(&source)?;

        let mut slide = self.add_slide(&layout)?;
        slide.remove_placeholders()?;
        copy::copy_shapes(&mut self.opc, &mut slide, None, &source, &mut PartImporter::new())?;
        self.store_slide(&slide)?;

        log::debug!("duplicated slide {} into {}", index, slide.partname());
        Ok(slide)
    }

    /// Append a slide based on `layout` holding copies of the shapes of
    /// `slide` from another deck. Parts the shapes refer to are imported
    /// through `importer`, so media shared by several slides is copied once.
    pub fn import_slide(
        &mut self,
        layout: &SlideLayout,
        source: &Package,
        slide: &Slide,
        importer: &mut PartImporter,
    ) -> Result<Slide> {
        let mut new_slide = self.add_slide(layout)?;
        new_slide.remove_placeholders()?;
        copy::copy_shapes(&mut self.opc, &mut new_slide, Some(&source.opc), slide, importer)?;
        self.store_slide(&new_slide)?;
        Ok(new_slide)
    }

    /// Remove the `index`-th slide from the slide list.
    ///
    /// The slide part is no longer reachable afterwards and is left out when
    /// the package is saved.
    pub fn remove_slide(&mut self, index: usize) -> Result<()> {
        let main = self.opc.part_mut(&self.main_partname)?;
        let mut doc = main.xml()?;
        let entry = remove_slide_id(&mut doc, index)?;
        main.set_xml(&doc);
        main.rels_mut().remove(&entry.r_id);

        log::debug!("removed slide {} (id {}, {})", index, entry.id, entry.r_id);
        Ok(())
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("main_partname", &self.main_partname)
            .field("parts", &self.opc.part_count())
            .finish()
    }
}

/// Position of `index` in a list of `count` layouts. Negative indices count
/// from the end.
pub fn resolve_layout_position(index: isize, count: usize) -> Result<usize> {
    let position = if index < 0 {
        count.checked_sub(index.unsigned_abs())
    } else {
        usize::try_from(index).ok().filter(|&position| position < count)
    };
    position.ok_or(OoxmlError::LayoutIndexOutOfRange { index, count })
}
